//! `ncpotd list` – enumeration only.

use anyhow::Result;
use ncpotd_core::config::ProviderConfig;
use ncpotd_core::{source, ProviderError};

pub async fn run_list(cfg: &ProviderConfig) -> Result<()> {
    match source::enumerate(cfg).await {
        Ok(candidates) => {
            for location in &candidates {
                println!("{}", location);
            }
            tracing::debug!("listed {} candidates", candidates.len());
        }
        Err(ProviderError::EmptyResult) => println!("No images found."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
