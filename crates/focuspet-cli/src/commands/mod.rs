pub mod config;
pub mod run;
pub mod simulate;
pub mod stats;

use std::path::Path;

use focuspet_core::Config;

/// Load from `path` when given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> focuspet_core::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
