//! Output reporters for mi-analysis results
//!
//! - `text` - One-shot scan listing files below grade A
//! - `json` - The historic series as machine-readable JSON
//! - `html` - Standalone historic report with the embedded chart

pub mod html;
pub mod json;
pub mod text;
