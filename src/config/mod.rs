//! Configuration module for mi-analysis
//!
//! Settings are layered, lowest priority first:
//! - built-in defaults
//! - user config (`~/.config/mi-analysis/config.toml`)
//! - project config (`--config <path>`, else `./mi-analysis.toml`)
//! - environment (`MI_ANALYSIS_SCORER`)
//! - command-line flags (applied by the CLI layer)

mod project_config;
mod user_config;

pub use project_config::{
    load_project_config, load_toml_layer, ChartConfig, ChartLayer, ConfigLayer, HistoryConfig,
    HistoryLayer, ProjectConfig, ScorerConfig, ScorerLayer, PROJECT_CONFIG_FILE,
};
pub use user_config::UserConfig;

use anyhow::Result;
use std::path::Path;

/// Environment variable that replaces the scorer program
pub const SCORER_ENV: &str = "MI_ANALYSIS_SCORER";

/// Resolve settings from every layer.
///
/// An explicit config path must exist and parse; the implicit files are
/// optional and skipped with a warning when broken.
pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<ProjectConfig> {
    let mut config = ProjectConfig::default();

    if let Some(layer) = UserConfig::load() {
        config.apply(layer);
    }

    match explicit {
        Some(path) => config.apply(load_toml_layer(path)?),
        None => {
            if let Some(layer) = load_project_config(working_dir) {
                config.apply(layer);
            }
        }
    }

    apply_env(&mut config, std::env::var(SCORER_ENV).ok());
    Ok(config)
}

fn apply_env(config: &mut ProjectConfig, scorer: Option<String>) {
    if let Some(program) = scorer.filter(|p| !p.trim().is_empty()) {
        match config.scorer.command.first_mut() {
            Some(first) => *first = program,
            None => config.scorer.command.push(program),
        }
    }
}
