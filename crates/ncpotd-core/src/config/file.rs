//! On-disk settings file: one `[Nextcloud]` table of optional keys.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory (under the XDG config home) shared with the picture-of-the-day host.
pub const CONFIG_DIR: &str = "plasma_engine_potd";
pub const CONFIG_FILE: &str = "nextcloudprovider.toml";

/// Raw, un-normalized settings exactly as stored. Every key is optional.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NextcloudSettings {
    /// Server base URL, e.g. `https://cloud.example.com`.
    pub url: String,
    /// WebDAV path below the base URL, e.g. `/remote.php/dav/files/alice/Wallpapers`.
    pub path: String,
    pub username: String,
    /// Stored in plaintext.
    pub password: String,
    /// Read from `local_path` instead of the server.
    pub use_local_path: bool,
    pub local_path: String,
    /// Maximum number of candidates to collect; `<= 0` means unbounded.
    pub max_images: i64,
}

impl std::fmt::Debug for NextcloudSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextcloudSettings")
            .field("url", &self.url)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("use_local_path", &self.use_local_path)
            .field("local_path", &self.local_path)
            .field("max_images", &self.max_images)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    #[serde(rename = "Nextcloud")]
    nextcloud: NextcloudSettings,
}

/// Default settings path: `~/.config/plasma_engine_potd/nextcloudprovider.toml`.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR)?;
    Ok(xdg_dirs.get_config_home().join(CONFIG_FILE))
}

pub fn parse_settings(text: &str) -> Result<NextcloudSettings> {
    let file: SettingsFile = toml::from_str(text)?;
    Ok(file.nextcloud)
}

pub fn render_settings(settings: &NextcloudSettings) -> Result<String> {
    let file = SettingsFile {
        nextcloud: settings.clone(),
    };
    Ok(toml::to_string_pretty(&file)?)
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn read_settings(path: &Path) -> Result<NextcloudSettings> {
    if !path.exists() {
        return Ok(NextcloudSettings::default());
    }
    let data =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_settings(&data).with_context(|| format!("parse {}", path.display()))
}

/// Writes settings to `path`, creating the parent directory if needed.
pub fn write_settings(path: &Path, settings: &NextcloudSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, render_settings(settings)?)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::debug!("saved settings to {}", path.display());
    Ok(())
}
