//! HTML reporter for historic runs
//!
//! Generates a single standalone HTML file:
//! - Run metadata as a key/value table
//! - The MI chart embedded as a base64 `data:` URI
//! - The raw series as pretty-printed JSON
//!
//! Every interpolated value is HTML-escaped.

use crate::models::{RunMetadata, Series};
use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Local;

pub const REPORT_TITLE: &str = "Historic MI Report";

/// Render the historic report
pub fn render(series: &Series, metadata: &RunMetadata, png: &[u8]) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head());
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header());

    html.push_str(&render_metadata(metadata));
    html.push_str(&render_chart(png));
    html.push_str(&render_raw_results(series)?);

    html.push_str("</div>\n</body>\n</html>\n");
    Ok(html)
}

fn render_head() -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{REPORT_TITLE}</title>
    <style>
{CSS}
    </style>
</head>
"#
    )
}

fn render_header() -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<h1>{REPORT_TITLE}</h1>
<p class="timestamp">Generated {}</p>
"#,
        timestamp
    )
}

fn render_metadata(metadata: &RunMetadata) -> String {
    let rows: Vec<String> = metadata
        .rows()
        .into_iter()
        .map(|(key, value)| {
            format!(
                "        <tr><th>{}</th><td>{}</td></tr>",
                html_escape(key),
                html_escape(&value)
            )
        })
        .collect();

    format!(
        r#"<h2>Metadata</h2>
<table>
{}
</table>
"#,
        rows.join("\n")
    )
}

fn render_chart(png: &[u8]) -> String {
    format!(
        r#"<h2>MI Time Series</h2>
<img src="data:image/png;base64,{}" alt="MI time series" class="chart" />
"#,
        STANDARD.encode(png)
    )
}

fn render_raw_results(series: &Series) -> Result<String> {
    let json = super::json::render_series(series)?;
    Ok(format!(
        r#"<h2>Raw Results (JSON)</h2>
<pre>{}</pre>
"#,
        html_escape(&json)
    ))
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
    color: #1e293b;
    margin: 20px;
}

.container { max-width: 1100px; margin: 0 auto; }
.timestamp { color: #64748b; font-size: 0.9rem; }

h2 {
    margin-top: 1.5rem;
    padding-bottom: 0.3rem;
    border-bottom: 2px solid #e2e8f0;
}

table { border-collapse: collapse; margin-bottom: 12px; }
th, td { border: 1px solid #ddd; padding: 6px 10px; }
th { text-align: left; padding-right: 8px; background: #f8fafc; }

.chart { max-width: 100%; height: auto; }

pre {
    background: #f6f8fa;
    padding: 12px;
    border-radius: 6px;
    overflow: auto;
}
"#;
