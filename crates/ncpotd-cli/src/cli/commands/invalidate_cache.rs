//! `ncpotd invalidate-cache` – backdate the host cache file.

use anyhow::{Context, Result};
use ncpotd_core::cache_defeat;
use std::path::Path;

pub fn run_invalidate_cache(cache_file: Option<&Path>) -> Result<()> {
    let path = match cache_file {
        Some(p) => p.to_path_buf(),
        None => cache_defeat::default_cache_path()?,
    };
    let touched = cache_defeat::invalidate(&path)
        .with_context(|| format!("backdate {}", path.display()))?;
    if touched {
        println!("Backdated {}", path.display());
    } else {
        println!("No cache file at {}", path.display());
    }
    Ok(())
}
