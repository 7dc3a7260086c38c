//! Text reporter for one-shot scans
//!
//! Lists files graded below `A`, one per line:
//!
//! ```text
//! - src/legacy.py: 42.17, D
//! ```

use crate::scorer::ScoreReport;
use crate::scoring::{classify, round2, Grade};
use std::path::Path;
use tracing::debug;

pub const STATIC_HEADING: &str = "=== CODE QUALITY (Radon) ===";

/// Render the files that need attention.
///
/// Paths are shown relative to `root` when they live under it.
pub fn render_static(report: &ScoreReport, root: &Path) -> String {
    let mut out = format!("\n{}\n", STATIC_HEADING);

    for (file, score) in report.iter() {
        let Some(mi) = score.mi else {
            debug!("Skipping {}: no maintainability score", file);
            continue;
        };
        let grade = classify(mi);
        if grade == Grade::A {
            continue;
        }
        out.push_str(&format!(
            "- {}: {}, {}\n",
            relative_path(file, root),
            format_score(mi),
            grade
        ));
    }

    out
}

/// Two-decimal score, always showing at least one decimal place
fn format_score(mi: f64) -> String {
    let rounded = round2(mi);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        rounded.to_string()
    }
}

fn relative_path(file: &str, root: &Path) -> String {
    let path = Path::new(file);
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => file.to_string(),
    }
}
