//! Host-facing metadata of the selected image.

use crate::cache_defeat::BASE_IDENTIFIER;
use crate::config::ProviderConfig;
use crate::selector::Selection;
use serde::Serialize;
use std::path::Path;

/// Everything the host may query about the current image. Finalized right
/// after selection, before the download starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    /// Absolute URL or absolute file path of the image.
    pub location: String,
    pub content_hash: String,
    /// `nextcloud_<content_hash>`.
    pub identifier: String,
    /// The image itself as a URL (`file://` for local images).
    pub remote_url: String,
    /// The enclosing folder as a URL.
    pub info_url: String,
    /// Final path segment of the location.
    pub title: String,
    /// Configured username in remote mode, empty in local mode.
    pub author: String,
}

pub fn is_remote_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Base identifier, suffixed with `_<hash>` once an image is chosen.
pub fn identifier_for(content_hash: Option<&str>) -> String {
    match content_hash {
        Some(hash) => format!("{}_{}", BASE_IDENTIFIER, hash),
        None => BASE_IDENTIFIER.to_string(),
    }
}

impl ImageMetadata {
    pub fn derive(selection: &Selection, config: &ProviderConfig) -> Self {
        let location = selection.location.clone();
        let (remote_url, info_url, author) = if is_remote_location(&location) {
            (
                location.clone(),
                config.listing_url(),
                config.username.clone(),
            )
        } else {
            let path = Path::new(&location);
            let parent = path.parent().unwrap_or(path);
            (file_url(path), file_url(parent), String::new())
        };
        let metadata = Self {
            title: title_of(&location),
            identifier: identifier_for(Some(&selection.content_hash)),
            content_hash: selection.content_hash.clone(),
            location,
            remote_url,
            info_url,
            author,
        };
        tracing::debug!(
            remote_url = %metadata.remote_url,
            info_url = %metadata.info_url,
            title = %metadata.title,
            author = %metadata.author,
            "metadata set"
        );
        metadata
    }
}

/// Last path segment: from the URL path for remote locations, the file name otherwise.
fn title_of(location: &str) -> String {
    if is_remote_location(location) {
        if let Ok(url) = url::Url::parse(location) {
            if let Some(segment) = url.path().split('/').filter(|s| !s.is_empty()).last() {
                return segment.to_string();
            }
        }
        return location.rsplit('/').next().unwrap_or_default().to_string();
    }
    Path::new(location)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}
