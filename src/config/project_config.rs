//! Project-level configuration support
//!
//! Loads settings from `mi-analysis.toml` (or an explicit `--config` file).
//!
//! # Configuration Format
//!
//! ```toml
//! # mi-analysis.toml
//!
//! [history]
//! max_commits = 50
//! skip = 1
//! branch = "main"
//!
//! [scorer]
//! command = ["radon", "mi", "-j"]
//! timeout_secs = 0        # 0 = wait for the analyzer indefinitely
//!
//! [chart]
//! width = 1000
//! height = 400
//! font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "mi-analysis.toml";

/// Fully resolved settings for a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    pub history: HistoryConfig,
    pub scorer: ScorerConfig,
    pub chart: ChartConfig,
}

/// Defaults for the `history` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub max_commits: usize,
    pub skip: usize,
    pub branch: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_commits: 50,
            skip: 1,
            branch: "HEAD".to_string(),
        }
    }
}

/// How the snapshot analyzer is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerConfig {
    /// Program and leading arguments; the snapshot path is appended
    pub command: Vec<String>,
    /// Seconds before the analyzer is killed (0 = no limit)
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            command: vec!["radon".into(), "mi".into(), "-j".into()],
            timeout_secs: 0,
        }
    }
}

/// Chart raster settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// TrueType font for titles and labels
    pub font: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            font: None,
        }
    }
}

/// One configuration source. Every field is optional so layers can be
/// stacked without a lower layer's defaults masking a higher one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub history: HistoryLayer,
    #[serde(default)]
    pub scorer: ScorerLayer,
    #[serde(default)]
    pub chart: ChartLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryLayer {
    pub max_commits: Option<usize>,
    pub skip: Option<usize>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScorerLayer {
    pub command: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartLayer {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub font: Option<PathBuf>,
}

impl ProjectConfig {
    /// Apply a layer on top of the current settings.
    ///
    /// Zero counts and empty commands are rejected with a warning and the
    /// previous value is kept.
    pub fn apply(&mut self, layer: ConfigLayer) {
        let ConfigLayer {
            history,
            scorer,
            chart,
        } = layer;

        match history.max_commits {
            Some(0) => warn!("history.max_commits must be at least 1, ignoring"),
            Some(n) => self.history.max_commits = n,
            None => {}
        }
        match history.skip {
            Some(0) => warn!("history.skip must be at least 1, ignoring"),
            Some(n) => self.history.skip = n,
            None => {}
        }
        if let Some(branch) = history.branch {
            self.history.branch = branch;
        }

        match scorer.command {
            Some(cmd) if cmd.is_empty() => warn!("scorer.command is empty, ignoring"),
            Some(cmd) => self.scorer.command = cmd,
            None => {}
        }
        if let Some(timeout) = scorer.timeout_secs {
            self.scorer.timeout_secs = timeout;
        }

        if let Some(width) = chart.width.filter(|w| *w > 0) {
            self.chart.width = width;
        }
        if let Some(height) = chart.height.filter(|h| *h > 0) {
            self.chart.height = height;
        }
        if chart.font.is_some() {
            self.chart.font = chart.font;
        }
    }
}

/// Parse a TOML config layer from disk
pub fn load_toml_layer(path: &Path) -> Result<ConfigLayer> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let layer: ConfigLayer = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(layer)
}

/// Load the project layer from `dir/mi-analysis.toml`, if present.
///
/// A file that cannot be read or parsed is logged and skipped.
pub fn load_project_config(dir: &Path) -> Option<ConfigLayer> {
    let toml_path = dir.join(PROJECT_CONFIG_FILE);
    if !toml_path.exists() {
        return None;
    }
    match load_toml_layer(&toml_path) {
        Ok(layer) => {
            debug!("Loaded project config from {}", toml_path.display());
            Some(layer)
        }
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    }
}
