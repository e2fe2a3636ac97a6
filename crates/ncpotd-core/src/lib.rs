pub mod config;
pub mod logging;

pub mod cache_defeat;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod metadata;
pub mod provider;
pub mod selector;
pub mod source;

pub use error::ProviderError;
pub use provider::{Activation, Phase, PotdImage, Provider};
