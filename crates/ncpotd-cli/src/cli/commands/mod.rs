//! CLI command handlers, one file per command.

mod completions;
pub(crate) mod config;
pub(crate) mod fetch;
mod invalidate_cache;
mod list;

pub use completions::{run_completions, run_man};
pub use config::{run_config_set, run_config_show, run_config_validate};
pub use fetch::{run_fetch, FetchOptions};
pub use invalidate_cache::run_invalidate_cache;
pub use list::run_list;
