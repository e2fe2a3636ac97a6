//! Read/write access to every setting plus validation, for configuration front ends.

use super::file::{config_path, read_settings, write_settings, NextcloudSettings};
use super::ProviderConfig;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A single editable setting, named as in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Url,
    Path,
    Username,
    Password,
    UseLocalPath,
    LocalPath,
    MaxImages,
}

impl ConfigField {
    pub const ALL: [ConfigField; 7] = [
        ConfigField::Url,
        ConfigField::Path,
        ConfigField::Username,
        ConfigField::Password,
        ConfigField::UseLocalPath,
        ConfigField::LocalPath,
        ConfigField::MaxImages,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ConfigField::Url => "Url",
            ConfigField::Path => "Path",
            ConfigField::Username => "Username",
            ConfigField::Password => "Password",
            ConfigField::UseLocalPath => "UseLocalPath",
            ConfigField::LocalPath => "LocalPath",
            ConfigField::MaxImages => "MaxImages",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigField {
    type Err = String;

    /// Accepts the file key case-insensitively, with or without `-`/`_` separators
    /// (`MaxImages`, `max-images`, `max_images`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        ConfigField::ALL
            .into_iter()
            .find(|f| f.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown setting '{}'", s))
    }
}

/// Holds the raw settings being edited and the file they belong to.
#[derive(Debug, Clone)]
pub struct ConfigEditor {
    path: PathBuf,
    settings: NextcloudSettings,
}

impl ConfigEditor {
    /// Opens the editor on `path`, loading existing settings if the file exists.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            settings: read_settings(path)?,
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&config_path()?)
    }

    /// Re-reads the settings file, discarding unsaved edits.
    pub fn reload(&mut self) -> Result<()> {
        self.settings = read_settings(&self.path)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        write_settings(&self.path, &self.settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &NextcloudSettings {
        &self.settings
    }

    /// The normalized config a provider would run with.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::from_settings(&self.settings)
    }

    pub fn url(&self) -> &str {
        &self.settings.url
    }

    pub fn path_setting(&self) -> &str {
        &self.settings.path
    }

    pub fn username(&self) -> &str {
        &self.settings.username
    }

    pub fn password(&self) -> &str {
        &self.settings.password
    }

    pub fn use_local_path(&self) -> bool {
        self.settings.use_local_path
    }

    pub fn local_path(&self) -> &str {
        &self.settings.local_path
    }

    pub fn max_images(&self) -> i64 {
        self.settings.max_images
    }

    // Setters return whether the value changed.

    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        replace(&mut self.settings.url, url.into())
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> bool {
        replace(&mut self.settings.path, path.into())
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> bool {
        replace(&mut self.settings.username, username.into())
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> bool {
        replace(&mut self.settings.password, password.into())
    }

    pub fn set_use_local_path(&mut self, use_local: bool) -> bool {
        replace(&mut self.settings.use_local_path, use_local)
    }

    pub fn set_local_path(&mut self, path: impl Into<String>) -> bool {
        replace(&mut self.settings.local_path, path.into())
    }

    pub fn set_max_images(&mut self, max: i64) -> bool {
        replace(&mut self.settings.max_images, max)
    }

    /// Sets a field from its textual form (as typed on a command line).
    pub fn set_field(&mut self, field: ConfigField, value: &str) -> Result<bool> {
        let changed = match field {
            ConfigField::Url => self.set_url(value),
            ConfigField::Path => self.set_path(value),
            ConfigField::Username => self.set_username(value),
            ConfigField::Password => self.set_password(value),
            ConfigField::UseLocalPath => self.set_use_local_path(parse_bool(value)?),
            ConfigField::LocalPath => self.set_local_path(value),
            ConfigField::MaxImages => self.set_max_images(
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("MaxImages must be an integer, got '{}'", value))?,
            ),
        };
        Ok(changed)
    }

    /// Textual value of a field; the password is masked.
    pub fn display_value(&self, field: ConfigField) -> String {
        match field {
            ConfigField::Url => self.settings.url.clone(),
            ConfigField::Path => self.settings.path.clone(),
            ConfigField::Username => self.settings.username.clone(),
            ConfigField::Password if self.settings.password.is_empty() => String::new(),
            ConfigField::Password => "********".to_string(),
            ConfigField::UseLocalPath => self.settings.use_local_path.to_string(),
            ConfigField::LocalPath => self.settings.local_path.clone(),
            ConfigField::MaxImages => self.settings.max_images.to_string(),
        }
    }

    /// Returns the first problem with the current settings, or an empty string when valid.
    pub fn validate(&self) -> String {
        let s = &self.settings;
        let problem = if s.use_local_path {
            if s.local_path.is_empty() {
                "Local path is required when using local path mode"
            } else if !Path::new(&s.local_path).is_dir() {
                "Local path does not exist"
            } else {
                ""
            }
        } else if s.url.is_empty() {
            "Nextcloud URL is required"
        } else if s.path.is_empty() {
            "WebDAV path is required"
        } else if s.username.is_empty() {
            "Username is required"
        } else if s.password.is_empty() {
            "Password is required"
        } else {
            ""
        };
        problem.to_string()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected true or false, got '{}'", other),
    }
}
