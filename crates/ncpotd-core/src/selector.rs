//! Random draw from the candidate set and the per-image content fingerprint.

use crate::error::ProviderError;
use crate::source::CandidateSet;
use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const HASH_LEN: usize = 12;

/// The drawn location and its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub location: String,
    pub content_hash: String,
}

/// First [`HASH_LEN`] lowercase hex chars of SHA-256(`location`).
///
/// Lets a caller build a per-image cache key (`nextcloud_<hash>`), since the
/// host's own key does not vary with the chosen image.
pub fn content_hash(location: &str) -> String {
    let mut hex = hex::encode(Sha256::digest(location.as_bytes()));
    hex.truncate(HASH_LEN);
    hex
}

/// Shuffles `candidates` in place, then draws one entry uniformly at random.
pub fn select(candidates: &mut CandidateSet) -> Result<Selection, ProviderError> {
    select_with(candidates, &mut rand::rng())
}

/// [`select`] with a caller-supplied RNG.
///
/// The shuffle followed by an independent draw is redundant for uniformity
/// but kept so the output distribution matches a shuffled-list provider.
pub fn select_with<R: Rng>(
    candidates: &mut CandidateSet,
    rng: &mut R,
) -> Result<Selection, ProviderError> {
    if candidates.is_empty() {
        tracing::warn!("cannot select random image: list is empty");
        return Err(ProviderError::EmptyResult);
    }
    candidates.as_mut_slice().shuffle(rng);
    let index = rng.random_range(0..candidates.len());
    let location = candidates.as_slice()[index].clone();
    tracing::debug!(
        "selected random image {} of {}: {}",
        index,
        candidates.len(),
        location
    );
    Ok(Selection {
        content_hash: content_hash(&location),
        location,
    })
}
