//! Maintainability time-series chart
//!
//! Rendering happens in two steps. [`ChartModel::from_series`] turns the
//! series into plottable geometry: parsed timestamps, line segments broken
//! at every gap, marker positions and padded axis ranges. The drawing step
//! then rasterizes that model to PNG, either in memory or into a file.
//!
//! Samples whose timestamp cannot be parsed are dropped entirely. Samples
//! without a score keep their slot on the time axis and split the line.

mod draw;
mod fonts;

use crate::config::ChartConfig;
use crate::models::SampleResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

pub const CHART_TITLE: &str = "Maintainability Index over time";
pub const X_AXIS_LABEL: &str = "Commit date";
pub const Y_AXIS_LABEL: &str = "Average MI";

const DAY: i64 = 24 * 60 * 60;

/// Chart rendering failures
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No valid date points to plot")]
    NoPlottableData,

    #[error("Chart drawing failed: {0}")]
    Drawing(String),

    #[error("Failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

/// A sample placed on the time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// Unix seconds
    pub x: i64,
    /// Aggregate score, `None` for a gap
    pub y: Option<f64>,
}

/// Label granularity for the time axis, picked from the span of the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAxis {
    Years,
    Months,
    Days,
    Hours,
}

impl DateAxis {
    /// Choose a granularity for a time span in seconds
    pub fn for_span(span_secs: i64) -> Self {
        if span_secs > 3 * 365 * DAY {
            DateAxis::Years
        } else if span_secs > 90 * DAY {
            DateAxis::Months
        } else if span_secs > 2 * DAY {
            DateAxis::Days
        } else {
            DateAxis::Hours
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            DateAxis::Years => "%Y",
            DateAxis::Months => "%Y-%m",
            DateAxis::Days => "%Y-%m-%d",
            DateAxis::Hours => "%m-%d %H:%M",
        }
    }

    /// Format an axis position (Unix seconds) as a label
    pub fn label(&self, secs: i64) -> String {
        match Utc.timestamp_opt(secs, 0).single() {
            Some(dt) => dt.format(self.pattern()).to_string(),
            None => String::new(),
        }
    }
}

/// Plottable geometry derived from a series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// Every sample with a parsable timestamp, in series order
    pub points: Vec<ChartPoint>,
    /// Runs of consecutive scored samples; a gap ends a run
    pub segments: Vec<Vec<(i64, f64)>>,
    pub x_range: Range<i64>,
    pub y_range: Range<f64>,
    pub axis: DateAxis,
}

impl ChartModel {
    /// Build the chart geometry, failing when no timestamp parses.
    pub fn from_series(series: &[SampleResult]) -> Result<Self, ChartError> {
        let points: Vec<ChartPoint> = series
            .iter()
            .filter_map(|sample| {
                parse_timestamp(&sample.timestamp).map(|dt| ChartPoint {
                    x: dt.timestamp(),
                    y: sample.aggregate_score.filter(|v| v.is_finite()),
                })
            })
            .collect();

        if points.is_empty() {
            return Err(ChartError::NoPlottableData);
        }

        let mut segments: Vec<Vec<(i64, f64)>> = Vec::new();
        let mut current = Vec::new();
        for point in &points {
            match point.y {
                Some(y) => current.push((point.x, y)),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
        let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
        let x_range = pad_time_range(min_x, max_x);
        let y_range = value_range(points.iter().filter_map(|p| p.y));
        let axis = DateAxis::for_span(max_x - min_x);

        Ok(Self {
            points,
            segments,
            x_range,
            y_range,
            axis,
        })
    }

    /// Scored samples, drawn as markers
    pub fn markers(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.points.iter().filter_map(|p| p.y.map(|y| (p.x, y)))
    }

    /// Number of gaps kept on the axis
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.y.is_none()).count()
    }
}

/// Render a series as PNG bytes.
pub fn render_png(series: &[SampleResult], config: &ChartConfig) -> Result<Vec<u8>, ChartError> {
    let model = ChartModel::from_series(series)?;
    draw::render(&model, config)
}

/// Render a series as a PNG file at `path`.
pub fn render_to_file(
    series: &[SampleResult],
    path: &Path,
    config: &ChartConfig,
) -> Result<(), ChartError> {
    let bytes = render_png(series, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Parse a sample timestamp.
///
/// Accepts RFC 3339, a naive ISO date-time, or a bare `YYYY-MM-DD` date.
/// Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn pad_time_range(min: i64, max: i64) -> Range<i64> {
    if min == max {
        return (min - DAY / 2)..(max + DAY / 2);
    }
    let pad = ((max - min) / 50).max(1);
    (min - pad)..(max + pad)
}

fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..100.0;
    }
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(date: &str, mi: Option<f64>) -> SampleResult {
        SampleResult {
            revision: format!("rev-{}", date),
            timestamp: date.to_string(),
            aggregate_score: mi,
            file_count: 1,
        }
    }

    #[test]
    fn test_gap_keeps_its_slot_and_splits_the_line() {
        let series = vec![
            sample("2020-01-01", Some(80.0)),
            sample("2020-02-01", None),
            sample("2020-03-01", Some(70.0)),
        ];
        let model = ChartModel::from_series(&series).unwrap();

        assert_eq!(model.points.len(), 3);
        assert_eq!(model.gap_count(), 1);
        assert_eq!(model.segments.len(), 2);
        assert_eq!(model.segments[0].len(), 1);
        assert_eq!(model.segments[1].len(), 1);

        let gap_x = model.points[1].x;
        assert!(model.x_range.contains(&gap_x));
        assert!(model
            .segments
            .iter()
            .flatten()
            .all(|(x, _)| *x != gap_x));
        assert_eq!(model.markers().count(), 2);
    }

    #[test]
    fn test_unparsable_timestamps_are_dropped() {
        let series = vec![
            sample("invalid-date", Some(10.0)),
            sample("2021-01-01T00:00:00", Some(60.0)),
            sample("2021-02-01T00:00:00", Some(65.0)),
        ];
        let model = ChartModel::from_series(&series).unwrap();
        assert_eq!(model.points.len(), 2);
        assert_eq!(model.segments, vec![vec![
            (1_609_459_200, 60.0),
            (1_612_137_600, 65.0)
        ]]);
    }

    #[test]
    fn test_nothing_plottable_is_an_error() {
        let series = vec![sample("invalid-date", Some(10.0))];
        assert!(matches!(
            ChartModel::from_series(&series),
            Err(ChartError::NoPlottableData)
        ));
        assert!(matches!(
            ChartModel::from_series(&[]),
            Err(ChartError::NoPlottableData)
        ));
    }

    #[test]
    fn test_all_gaps_still_plots_axis() {
        let series = vec![sample("2020-01-01", None), sample("2020-01-02", None)];
        let model = ChartModel::from_series(&series).unwrap();
        assert!(model.segments.is_empty());
        assert_eq!(model.y_range, 0.0..100.0);
    }

    #[test]
    fn test_single_point_ranges_are_not_empty() {
        let model = ChartModel::from_series(&[sample("2022-03-03T09:00:00", Some(50.0))]).unwrap();
        assert!(model.x_range.start < model.x_range.end);
        assert!(model.y_range.start < 50.0 && model.y_range.end > 50.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2020-01-01T12:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01T13:00:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2020-01-01 12:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2020-01-01"),
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_date_axis_adapts_to_span() {
        assert_eq!(DateAxis::for_span(5 * 365 * DAY), DateAxis::Years);
        assert_eq!(DateAxis::for_span(200 * DAY), DateAxis::Months);
        assert_eq!(DateAxis::for_span(10 * DAY), DateAxis::Days);
        assert_eq!(DateAxis::for_span(3600), DateAxis::Hours);

        let secs = Utc.with_ymd_and_hms(2021, 6, 15, 8, 30, 0).unwrap().timestamp();
        assert_eq!(DateAxis::Years.label(secs), "2021");
        assert_eq!(DateAxis::Months.label(secs), "2021-06");
        assert_eq!(DateAxis::Days.label(secs), "2021-06-15");
        assert_eq!(DateAxis::Hours.label(secs), "06-15 08:30");
    }

    #[test]
    fn test_render_png_has_signature() {
        let series = vec![
            sample("2020-01-01T00:00:00", Some(80.0)),
            sample("2020-02-01T00:00:00", Some(75.0)),
        ];
        let config = ChartConfig {
            width: 320,
            height: 160,
            font: None,
        };
        let png = render_png(&series, &config).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_to_file_with_gap() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let series = vec![
            sample("2021-01-01T00:00:00", Some(60.0)),
            sample("2021-02-01T00:00:00", None),
            sample("2021-03-01T00:00:00", Some(70.0)),
        ];
        render_to_file(&series, &out, &ChartConfig::default()).unwrap();
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_render_without_points_fails() {
        let series = vec![sample("invalid-date", Some(10.0))];
        assert!(matches!(
            render_png(&series, &ChartConfig::default()),
            Err(ChartError::NoPlottableData)
        ));
    }
}
