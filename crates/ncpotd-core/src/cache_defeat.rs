//! Workaround for the host's daily cache, which this provider does not control.
//!
//! The host stores the last result in one file keyed by the static identifier
//! `nextcloud` and reuses it while the file's modification time is younger
//! than one day. Backdating that timestamp makes the host treat the cache as
//! stale and instantiate the provider again, so each activation can yield a
//! different image.
//!
//! Best-effort and racy: the host may check freshness between our rewrite and
//! its own read. This is not a cache API; it touches exactly one path and only
//! its modification time.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// How long the host considers its cached result fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// How far into the past the timestamp is moved (two freshness windows).
pub const BACKDATE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Host cache directory (under the XDG cache home) and the static cache key.
pub const CACHE_DIR: &str = "plasma_engine_potd";
pub const BASE_IDENTIFIER: &str = "nextcloud";

/// The host's cache file: `~/.cache/plasma_engine_potd/nextcloud`.
pub fn default_cache_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(CACHE_DIR)?;
    Ok(xdg_dirs.get_cache_home().join(BASE_IDENTIFIER))
}

/// Rewrites the modification time of the file at `path` to now minus [`BACKDATE`],
/// leaving its content untouched.
///
/// Returns `Ok(false)` without creating anything when no file exists at `path`.
pub fn invalidate(path: &Path) -> io::Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let file = match OpenOptions::new().write(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let when = SystemTime::now()
        .checked_sub(BACKDATE)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    file.set_modified(when)?;
    tracing::debug!(
        "invalidated cache file (mod time set {} h back): {}",
        BACKDATE.as_secs() / 3600,
        path.display()
    );
    Ok(true)
}
