//! Remote enumeration: one recursive PROPFIND against `base_url + base_path`.

use super::{collect_image_hrefs, CandidateSet};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http;

/// First empty required remote field, if any.
pub(crate) fn missing_remote_field(config: &ProviderConfig) -> Option<&'static str> {
    [
        ("url", config.remote_base_url.as_str()),
        ("path", config.remote_base_path.as_str()),
        ("username", config.username.as_str()),
        ("password", config.password.as_str()),
    ]
    .into_iter()
    .find(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
}

/// Lists the configured folder and returns the capped image references.
///
/// Fails with `ConfigIncomplete` before any request when url, path, username
/// or password is empty. May return an empty set; the caller decides.
pub async fn enumerate_remote(config: &ProviderConfig) -> Result<CandidateSet, ProviderError> {
    if let Some(field) = missing_remote_field(config) {
        tracing::warn!("Nextcloud configuration incomplete: {} is empty", field);
        return Err(ProviderError::ConfigIncomplete { field });
    }

    let url = config.listing_url();
    let credentials = config.credentials();
    tracing::debug!("PROPFIND {}", url);

    let body = tokio::task::spawn_blocking({
        let url = url.clone();
        move || http::propfind(&url, &credentials)
    })
    .await?
    .map_err(|e| {
        tracing::warn!("PROPFIND {} failed: {}", url, e);
        ProviderError::Listing(e)
    })?;

    Ok(collect_image_hrefs(
        &body,
        &config.remote_base_url,
        config.image_cap(),
    ))
}
