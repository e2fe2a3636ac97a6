//! Candidate enumeration: recursive WebDAV listing or local directory walk.
//!
//! Both variants apply the same extension allow-list and the same cap: the
//! first `max_images` qualifying entries in arrival order are kept, before any
//! shuffling happens.

mod local;
mod parse;
mod remote;

pub use local::enumerate_local;
pub use parse::collect_image_hrefs;
pub use remote::enumerate_remote;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Recognized image extensions, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif"];

/// True if `name` ends in `.<ext>` for an allow-listed extension.
pub fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// Ordered image locations (absolute URLs or absolute file paths), optionally capped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    locations: Vec<String>,
    cap: Option<usize>,
}

impl CandidateSet {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            locations: Vec::new(),
            cap,
        }
    }

    /// Appends `location` unless the cap is already reached.
    /// Returns true once the set is full and accumulation should stop.
    pub fn offer(&mut self, location: String) -> bool {
        if !self.is_full() {
            self.locations.push(location);
        }
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.locations.len() >= cap)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.locations
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [String] {
        &mut self.locations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.locations.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.locations
    }
}

impl From<Vec<String>> for CandidateSet {
    fn from(locations: Vec<String>) -> Self {
        Self {
            locations,
            cap: None,
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds the candidate set for the configured mode.
pub async fn enumerate(config: &ProviderConfig) -> Result<CandidateSet, ProviderError> {
    let set = if config.use_local_source {
        enumerate_local(config).await?
    } else {
        enumerate_remote(config).await?
    };
    if set.is_empty() {
        tracing::warn!("no images found");
        return Err(ProviderError::EmptyResult);
    }
    tracing::debug!("enumerated {} candidate images", set.len());
    Ok(set)
}
