//! Core data models for mi-analysis
//!
//! These models flow through every stage of a historic run: commits come
//! out of the git layer, samples come out of the checkout loop, and the
//! series plus run metadata go into the reporters.

use serde::{Deserialize, Serialize};

/// A commit on the sampled ref, as reported by the git layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full revision hash
    pub id: String,
    /// Committer timestamp (RFC 3339, committer's UTC offset)
    pub timestamp: String,
}

impl Commit {
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// One visited point in history.
///
/// `aggregate_score` is `None` when the scorer produced no usable values.
/// That is a gap in the series, not a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    #[serde(rename = "sha")]
    pub revision: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    #[serde(rename = "avg_mi")]
    pub aggregate_score: Option<f64>,
    #[serde(rename = "files")]
    pub file_count: usize,
}

impl SampleResult {
    /// True when this sample is a gap in the series
    pub fn is_gap(&self) -> bool {
        self.aggregate_score.is_none()
    }
}

/// Samples collected by one historic run, oldest first.
pub type Series = Vec<SampleResult>;

/// Parameters of a historic run, embedded verbatim in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Repository source as given on the command line (path or URL)
    pub repo: String,
    /// Ref that was walked
    pub branch: String,
    pub max_commits: usize,
    pub skip: usize,
    /// Number of commits reachable from the ref
    pub total_commits: usize,
    /// Number of samples actually recorded
    pub collected_points: usize,
}

impl RunMetadata {
    /// Key/value rows in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("repo", self.repo.clone()),
            ("branch", self.branch.clone()),
            ("max_commits", self.max_commits.to_string()),
            ("skip", self.skip.to_string()),
            ("total_commits", self.total_commits.to_string()),
            ("collected_points", self.collected_points.to_string()),
        ]
    }
}
