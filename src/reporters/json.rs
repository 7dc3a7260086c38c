//! JSON reporter
//!
//! Outputs the series as pretty-printed JSON. Non-ASCII text is written
//! as is rather than escaped.

use crate::models::Series;
use anyhow::Result;

/// Render the series as JSON
pub fn render_series(series: &Series) -> Result<String> {
    Ok(serde_json::to_string_pretty(series)?)
}

/// Parse a series previously written by [`render_series`]
pub fn parse_series(json: &str) -> Result<Series> {
    Ok(serde_json::from_str(json)?)
}
