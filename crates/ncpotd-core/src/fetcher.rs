//! Retrieves the selected image and decodes it into a bitmap.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http;
use crate::metadata::is_remote_location;
use image::DynamicImage;
use std::path::PathBuf;

/// Decodes jpeg/png/bmp/webp/gif bytes; the format is guessed from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ProviderError> {
    image::load_from_memory(bytes).map_err(|e| {
        tracing::warn!("failed to load image from data: {}", e);
        ProviderError::Decode(e)
    })
}

/// Downloads (authenticated GET) or reads `location`, then decodes it.
pub async fn fetch(location: &str, config: &ProviderConfig) -> Result<DynamicImage, ProviderError> {
    let bytes = if is_remote_location(location) {
        let url = location.to_string();
        let credentials = config.credentials();
        tracing::debug!("GET {}", url);
        tokio::task::spawn_blocking(move || http::get(&url, &credentials))
            .await?
            .map_err(|e| {
                tracing::warn!("image download error: {}", e);
                ProviderError::Transport(e)
            })?
    } else {
        let path = PathBuf::from(location);
        match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                tracing::warn!("failed to read {}: {}", path.display(), source);
                return Err(ProviderError::LocalRead { path, source });
            }
        }
    };

    tracing::debug!("decoding {} bytes from {}", bytes.len(), location);
    let image = tokio::task::spawn_blocking(move || decode(&bytes)).await??;
    Ok(image)
}
