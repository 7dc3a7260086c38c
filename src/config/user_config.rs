//! User-level configuration for mi-analysis
//!
//! Read from `~/.config/mi-analysis/config.toml` (platform config dir).
//! Uses the same schema as the project file.

use super::project_config::{load_toml_layer, ConfigLayer};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct UserConfig;

impl UserConfig {
    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mi-analysis").join("config.toml"))
    }

    /// Load the user layer, if a config file exists and parses
    pub fn load() -> Option<ConfigLayer> {
        let path = Self::user_config_path().filter(|p| p.exists())?;
        match load_toml_layer(&path) {
            Ok(layer) => {
                debug!("Loaded user config from {}", path.display());
                Some(layer)
            }
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }
}
