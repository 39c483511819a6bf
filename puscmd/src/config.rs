//! Configuration loading for puscmd

use std::path::Path;

use log::info;
use puslib::{load_config, ClientConfig, CmdResult};

/// Configuration constants
pub mod constants {
    /// Configuration file picked up from the working directory when no
    /// `--config` option is given
    pub const DEFAULT_CONFIG_PATH: &str = "puscmd.json";
}

/// Load the client configuration.
///
/// An explicitly given file must exist. Otherwise the default file is used if
/// present, and the built-in defaults if not.
pub fn load(path: Option<&Path>) -> CmdResult<ClientConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config(path)
        }
        None => {
            let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                info!("Loading configuration from: {}", default_path.display());
                load_config(default_path)
            } else {
                Ok(ClientConfig::default())
            }
        }
    }
}
