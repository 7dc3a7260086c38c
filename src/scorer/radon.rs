//! Radon maintainability-index scorer
//!
//! Runs `radon mi -j <path>` (or a configured replacement that speaks the
//! same JSON) and parses its per-file report.

use super::external_tool::run_external_tool;
use super::{ScoreReport, Scorer};
use crate::config::ScorerConfig;
use std::path::Path;
use tracing::{debug, warn};

/// Scorer backed by the radon command-line tool.
#[derive(Debug, Clone)]
pub struct RadonScorer {
    command: Vec<String>,
    timeout_secs: u64,
}

impl Default for RadonScorer {
    fn default() -> Self {
        Self::from_config(&ScorerConfig::default())
    }
}

impl RadonScorer {
    /// Build a scorer from `[scorer]` settings
    pub fn from_config(config: &ScorerConfig) -> Self {
        Self {
            command: config.command.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    fn tool_name(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("radon")
    }

    fn command_for(&self, path: &Path) -> Vec<String> {
        let mut cmd = self.command.clone();
        cmd.push(path.to_string_lossy().to_string());
        cmd
    }
}

impl Scorer for RadonScorer {
    fn score(&self, path: &Path) -> ScoreReport {
        let result = run_external_tool(&self.command_for(path), self.tool_name(), self.timeout_secs, None);

        if !result.success {
            warn!(
                "Error running {}: {}",
                self.tool_name(),
                result.error.as_deref().unwrap_or("unknown error")
            );
            return ScoreReport::new();
        }

        if result.stdout.trim().is_empty() {
            debug!(
                "{} produced no output for {} (exit code {:?})",
                self.tool_name(),
                path.display(),
                result.return_code
            );
            return ScoreReport::new();
        }

        match result.json_output().as_ref().and_then(ScoreReport::from_json) {
            Some(report) => {
                debug!("{} scored {} files", self.tool_name(), report.len());
                report
            }
            None => {
                warn!("Could not parse {} output as a score report", self.tool_name());
                ScoreReport::new()
            }
        }
    }
}
