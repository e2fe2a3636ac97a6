//! Provider configuration: loaded once per provider, immutable afterwards.

mod editor;
mod file;

pub use editor::{ConfigEditor, ConfigField};
pub use file::{
    config_path, parse_settings, read_settings, render_settings, write_settings,
    NextcloudSettings, CONFIG_DIR, CONFIG_FILE,
};

use crate::http::Credentials;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Normalized settings the pipeline runs on.
///
/// `remote_base_url` never ends with `/` and `remote_base_path` always starts
/// with `/`, so `remote_base_url + remote_base_path` and
/// `remote_base_url + href` each contain exactly one separating slash.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub remote_base_url: String,
    pub remote_base_path: String,
    pub username: String,
    pub password: String,
    pub use_local_source: bool,
    pub local_root_path: PathBuf,
    /// 0 = unbounded.
    pub max_images: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("remote_base_url", &self.remote_base_url)
            .field("remote_base_path", &self.remote_base_path)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("use_local_source", &self.use_local_source)
            .field("local_root_path", &self.local_root_path)
            .field("max_images", &self.max_images)
            .finish()
    }
}

impl ProviderConfig {
    pub fn from_settings(settings: &NextcloudSettings) -> Self {
        Self {
            remote_base_url: normalize_base_url(&settings.url),
            remote_base_path: normalize_base_path(&settings.path),
            username: settings.username.clone(),
            password: settings.password.clone(),
            use_local_source: settings.use_local_path,
            local_root_path: PathBuf::from(&settings.local_path),
            max_images: usize::try_from(settings.max_images).unwrap_or(0),
        }
    }

    /// Candidate cap, or `None` when unbounded.
    pub fn image_cap(&self) -> Option<usize> {
        (self.max_images > 0).then_some(self.max_images)
    }

    /// Folder being listed: `remote_base_url + remote_base_path`.
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.remote_base_url, self.remote_base_path)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Strips one trailing `/`.
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

/// Ensures a leading `/`. An empty path stays empty so it still reads as unset.
pub fn normalize_base_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Parses a settings document into a normalized config.
pub fn parse(text: &str) -> Result<ProviderConfig> {
    Ok(ProviderConfig::from_settings(&parse_settings(text)?))
}

pub fn load_from_path(path: &Path) -> Result<ProviderConfig> {
    Ok(ProviderConfig::from_settings(&read_settings(path)?))
}

/// Loads the config from the default location. Never fails: a missing,
/// unreadable or malformed file yields the all-defaults config.
pub fn load() -> ProviderConfig {
    let loaded = config_path().and_then(|path| load_from_path(&path));
    match loaded {
        Ok(cfg) => {
            tracing::debug!("loaded config: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::warn!("using default config: {:#}", e);
            ProviderConfig::from_settings(&NextcloudSettings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_one_trailing_slash() {
        assert_eq!(normalize_base_url("https://host/"), "https://host");
        assert_eq!(normalize_base_url("https://host"), "https://host");
        assert_eq!(normalize_base_url("https://host//"), "https://host/");
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn base_path_gets_leading_slash() {
        assert_eq!(normalize_base_path("remote.php/dav"), "/remote.php/dav");
        assert_eq!(normalize_base_path("/remote.php/dav"), "/remote.php/dav");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn parse_normalizes() {
        let cfg = parse(
            r#"
            [Nextcloud]
            Url = "https://host/"
            Path = "remote.php/dav/files/u/Pics"
            Username = "u"
            Password = "p"
            MaxImages = 10
        "#,
        )
        .unwrap();
        assert_eq!(cfg.remote_base_url, "https://host");
        assert_eq!(cfg.remote_base_path, "/remote.php/dav/files/u/Pics");
        assert_eq!(cfg.listing_url(), "https://host/remote.php/dav/files/u/Pics");
        assert_eq!(cfg.image_cap(), Some(10));
        assert!(!cfg.use_local_source);
    }

    #[test]
    fn non_positive_cap_is_unbounded() {
        let cfg = parse("[Nextcloud]\nMaxImages = -4\n").unwrap();
        assert_eq!(cfg.max_images, 0);
        assert_eq!(cfg.image_cap(), None);
        let cfg = parse("[Nextcloud]\nMaxImages = 0\n").unwrap();
        assert_eq!(cfg.image_cap(), None);
    }

    #[test]
    fn local_mode_fields() {
        let cfg = parse("[Nextcloud]\nUseLocalPath = true\nLocalPath = \"/srv/pics\"\n").unwrap();
        assert!(cfg.use_local_source);
        assert_eq!(cfg.local_root_path, PathBuf::from("/srv/pics"));
    }

    #[test]
    fn load_from_missing_path_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from_path(&dir.path().join("none.toml")).unwrap();
        assert!(cfg.remote_base_url.is_empty());
        assert!(cfg.remote_base_path.is_empty());
        assert!(!cfg.use_local_source);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse("[Nextcloud\nUrl = ").is_err());
    }
}
