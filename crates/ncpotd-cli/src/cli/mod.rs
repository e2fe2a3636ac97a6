//! CLI host for the Nextcloud picture-of-the-day provider.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use ncpotd_core::config::{self, ConfigField, ProviderConfig};
use std::path::{Path, PathBuf};

use commands::{
    run_completions, run_config_set, run_config_show, run_config_validate, run_fetch,
    run_invalidate_cache, run_list, run_man, FetchOptions,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ncpotd")]
#[command(about = "Picture of the day from a Nextcloud folder or a local directory", long_about = None)]
pub struct Cli {
    /// Settings file to use instead of ~/.config/plasma_engine_potd/nextcloudprovider.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Pick a random image, download and decode it, and save it.
    Fetch {
        /// Where to write the image; the format follows the extension. Default: <identifier>.png.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Print metadata as JSON.
        #[arg(long)]
        json: bool,
        /// Host cache file to backdate. Default: ~/.cache/plasma_engine_potd/nextcloud.
        #[arg(long, value_name = "FILE")]
        cache_file: Option<PathBuf>,
    },

    /// List the candidate images without selecting one.
    List,

    /// Backdate the host cache file so the next lookup misses.
    InvalidateCache {
        /// Cache file. Default: ~/.cache/plasma_engine_potd/nextcloud.
        #[arg(long, value_name = "FILE")]
        cache_file: Option<PathBuf>,
    },

    /// Show, validate or edit the settings file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print every setting (password masked).
    Show,
    /// Report the first problem with the settings; exits non-zero if there is one.
    Validate,
    /// Change one setting and save the file.
    Set {
        /// Setting name: Url, Path, Username, Password, UseLocalPath, LocalPath, MaxImages.
        field: ConfigField,
        value: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_file = cli.config;

        match cli.command {
            CliCommand::Fetch {
                output,
                json,
                cache_file,
            } => {
                let cfg = provider_config(config_file.as_deref())?;
                let opts = FetchOptions {
                    output,
                    json,
                    cache_file,
                };
                run_fetch(cfg, opts).await?;
            }
            CliCommand::List => run_list(&provider_config(config_file.as_deref())?).await?,
            CliCommand::InvalidateCache { cache_file } => {
                run_invalidate_cache(cache_file.as_deref())?
            }
            CliCommand::Config { action } => {
                let path = match config_file {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                match action {
                    ConfigAction::Show => run_config_show(&path)?,
                    ConfigAction::Validate => run_config_validate(&path)?,
                    ConfigAction::Set { field, value } => {
                        run_config_set(&path, field, &value)?;
                    }
                }
            }
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

/// An explicit `--config` file must parse; the default location never fails.
fn provider_config(path: Option<&Path>) -> Result<ProviderConfig> {
    match path {
        Some(path) => config::load_from_path(path),
        None => Ok(config::load()),
    }
}

#[cfg(test)]
mod tests;
