//! Snapshot scoring
//!
//! A snapshot scorer looks at a working tree on disk and returns one
//! maintainability score per source file. The production scorer shells out
//! to radon; tests substitute deterministic fakes through the [`Scorer`]
//! trait.

mod external_tool;
mod radon;

pub use external_tool::{run_external_tool, ExternalToolResult};
pub use radon::RadonScorer;

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;

/// Produces a per-file score report for a directory.
///
/// Implementations never fail: any problem running the analyzer degrades
/// to an empty report.
pub trait Scorer {
    fn score(&self, path: &Path) -> ScoreReport;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score(&self, path: &Path) -> ScoreReport {
        (**self).score(path)
    }
}

/// Score for a single file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileScore {
    /// Maintainability index, if the analyzer produced a number
    pub mi: Option<f64>,
    /// Letter rank reported by the analyzer, if any
    pub rank: Option<String>,
}

impl FileScore {
    pub fn new(mi: f64) -> Self {
        Self {
            mi: Some(mi),
            rank: None,
        }
    }

    /// An entry the analyzer reported without a usable score
    pub fn unscored() -> Self {
        Self::default()
    }
}

/// Mapping from file path to score for one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreReport {
    files: BTreeMap<String, FileScore>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse analyzer JSON of the form `{"path": {"mi": 71.2, "rank": "A"}, ...}`.
    ///
    /// Entries whose `mi` is missing or not a number are kept with `mi = None`.
    /// Returns `None` if the top-level value is not an object.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let object = value.as_object()?;
        let files = object
            .iter()
            .map(|(path, entry)| {
                let score = FileScore {
                    mi: entry.get("mi").and_then(JsonValue::as_f64),
                    rank: entry
                        .get("rank")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string),
                };
                (path.clone(), score)
            })
            .collect();
        Some(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileScore)> {
        self.files.iter().map(|(path, score)| (path.as_str(), score))
    }
}

impl<K: Into<String>> FromIterator<(K, FileScore)> for ScoreReport {
    fn from_iter<I: IntoIterator<Item = (K, FileScore)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
