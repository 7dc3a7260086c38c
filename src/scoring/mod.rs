//! Maintainability aggregation and grading
//!
//! # Grade thresholds
//!
//! ```text
//! MI >= 85  -> A
//! MI >= 70  -> B
//! MI >= 50  -> C
//! MI >= 30  -> D
//! otherwise -> E
//! ```
//!
//! Lower bounds are inclusive, so a score sitting exactly on a boundary
//! belongs to the higher grade.

use crate::scorer::ScoreReport;
use serde::{Deserialize, Serialize};

/// Letter classification of a maintainability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        };
        f.write_str(letter)
    }
}

/// Classify a maintainability score.
///
/// NaN compares false against every threshold and falls through to `E`.
pub fn classify(score: f64) -> Grade {
    if score >= 85.0 {
        Grade::A
    } else if score >= 70.0 {
        Grade::B
    } else if score >= 50.0 {
        Grade::C
    } else if score >= 30.0 {
        Grade::D
    } else {
        Grade::E
    }
}

/// Mean maintainability score across all files with a numeric score.
///
/// Returns `None` for an empty report, one with no numeric scores, or one
/// whose mean is not finite.
pub fn aggregate(report: &ScoreReport) -> Option<f64> {
    let (sum, count) = report
        .iter()
        .filter_map(|(_, score)| score.mi)
        .fold((0.0, 0usize), |(sum, count), mi| (sum + mi, count + 1));

    if count == 0 {
        return None;
    }
    // an overflowing sum cannot be represented in the series
    Some(sum / count as f64).filter(|mean| mean.is_finite())
}

/// Round to two decimal places.
///
/// Rounds the exact binary value, so ties go to the even digit:
/// `70.125` becomes `70.12` and `2.675` (stored just below) becomes `2.67`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
