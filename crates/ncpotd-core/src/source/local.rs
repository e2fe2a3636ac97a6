//! Local enumeration: recursive walk of the configured root.

use super::{has_image_extension, CandidateSet};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use std::fs::File;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Dot-files and dot-directories are skipped, along with everything below them.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Walks `root` and collects readable regular image files in walk order, up to `cap`.
/// Hidden entries below `root` are not visited. `root` must exist.
pub(crate) fn walk_images(root: &Path, cap: Option<usize>) -> CandidateSet {
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let mut set = CandidateSet::new(cap);

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !has_image_extension(&name) {
            continue;
        }
        let path = entry.path();
        if File::open(path).is_err() {
            tracing::debug!("skipping unreadable {}", path.display());
            continue;
        }
        if set.offer(path.to_string_lossy().into_owned()) {
            break;
        }
    }

    set
}

/// Enumerates images below the configured local root.
///
/// Fails with `ConfigIncomplete` when the root is empty and `PathNotFound`
/// when it is not an existing directory. May return an empty set.
pub async fn enumerate_local(config: &ProviderConfig) -> Result<CandidateSet, ProviderError> {
    let root = config.local_root_path.clone();
    if root.as_os_str().is_empty() {
        tracing::warn!("Local path not configured");
        return Err(ProviderError::ConfigIncomplete { field: "local path" });
    }
    if !root.is_dir() {
        tracing::warn!("Local path does not exist: {}", root.display());
        return Err(ProviderError::PathNotFound(root));
    }

    let cap = config.image_cap();
    let set = tokio::task::spawn_blocking(move || walk_images(&root, cap)).await?;
    Ok(set)
}
