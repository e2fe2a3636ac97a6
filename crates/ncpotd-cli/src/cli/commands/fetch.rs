//! `ncpotd fetch` – one full activation, image saved to disk.

use anyhow::{Context, Result};
use ncpotd_core::cache_defeat;
use ncpotd_core::config::ProviderConfig;
use ncpotd_core::metadata::ImageMetadata;
use ncpotd_core::Provider;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct FetchOptions {
    pub output: Option<PathBuf>,
    pub json: bool,
    pub cache_file: Option<PathBuf>,
}

pub async fn run_fetch(cfg: ProviderConfig, opts: FetchOptions) -> Result<()> {
    let cache_path = host_cache_path(opts.cache_file);
    let (provider, activation) = Provider::start(cfg, cache_path);
    let potd = activation.await?;
    drop(provider);

    let output = opts
        .output
        .unwrap_or_else(|| default_output(&potd.metadata));
    let image = potd.image;
    let save_to = output.clone();
    tokio::task::spawn_blocking(move || image.save(&save_to))
        .await?
        .with_context(|| format!("save image to {}", output.display()))?;

    if opts.json {
        println!("{}", render_json(&potd.metadata, &output)?);
    } else {
        print!("{}", render_plain(&potd.metadata, &output));
    }
    Ok(())
}

/// The explicit `--cache-file`, else the host default. Without either the
/// cache step is skipped.
pub(crate) fn host_cache_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    match cache_defeat::default_cache_path() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!("no host cache path: {:#}", e);
            None
        }
    }
}

/// `<identifier>.png` in the working directory.
pub(crate) fn default_output(metadata: &ImageMetadata) -> PathBuf {
    PathBuf::from(format!("{}.png", metadata.identifier))
}

pub(crate) fn render_plain(metadata: &ImageMetadata, output: &Path) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Image", &metadata.remote_url),
        ("Folder", &metadata.info_url),
        ("Identifier", &metadata.identifier),
    ] {
        out.push_str(&format!("{:<11} {}\n", format!("{}:", label), value));
    }
    out.push_str(&format!("{:<11} {}\n", "Saved:", output.display()));
    out
}

pub(crate) fn render_json(metadata: &ImageMetadata, output: &Path) -> Result<String> {
    let value = serde_json::json!({
        "metadata": metadata,
        "output": output.display().to_string(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
