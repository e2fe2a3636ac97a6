//! Terminal error kinds of one provider activation.

use crate::http::RequestError;
use std::path::PathBuf;
use thiserror::Error;

/// Every way an activation can end without a bitmap. None of these are retried.
///
/// Messages name only the failed step; the underlying cause is the `source()`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A field required by the active mode is empty.
    #[error("configuration incomplete: {field} is empty")]
    ConfigIncomplete { field: &'static str },

    /// The configured local root does not exist or is not a directory.
    #[error("local path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The directory listing request failed.
    #[error("directory listing failed")]
    Listing(#[source] RequestError),

    /// The image download failed.
    #[error("image download failed")]
    Transport(#[source] RequestError),

    /// Enumeration finished with zero qualifying images.
    #[error("no images found")]
    EmptyResult,

    /// The retrieved bytes are not a supported image.
    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),

    /// The selected local file could not be read.
    #[error("failed to read {}", path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking worker (curl, walk, decode) panicked or was cancelled.
    #[error("worker task failed")]
    Worker(#[from] tokio::task::JoinError),

    /// The activation was abandoned before it produced a result
    /// (provider dropped or superseded by `refresh`).
    #[error("activation cancelled")]
    Cancelled,
}
