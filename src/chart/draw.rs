//! Rasterizing a [`ChartModel`] with plotters

use super::{fonts, ChartError, ChartModel, CHART_TITLE, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::config::ChartConfig;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;

const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const MARKER_RADIUS: i32 = 4;

/// Draw the model and encode it as PNG.
pub(super) fn render(model: &ChartModel, config: &ChartConfig) -> Result<Vec<u8>, ChartError> {
    let (width, height) = (config.width.max(64), config.height.max(64));
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    if !fonts::ensure_registered(config.font.as_deref()) {
        return Err(ChartError::Drawing("no usable font for chart text".to_string()));
    }
    draw_rgb(model, &mut buffer, (width, height))?;

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Drawing("pixel buffer has the wrong size".to_string()))?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

fn draw_rgb(model: &ChartModel, buffer: &mut [u8], size: (u32, u32)) -> Result<(), ChartError> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(CHART_TITLE, (fonts::FAMILY, 22))
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(model.x_range.clone(), model.y_range.clone())
        .map_err(drawing)?;

    let axis = model.axis;
    let x_formatter = move |secs: &i64| axis.label(*secs);
    let y_formatter = |value: &f64| format!("{:.0}", value);

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .label_style((fonts::FAMILY, 13))
        .light_line_style(RGBColor(235, 235, 235))
        .draw()
        .map_err(drawing)?;

    for segment in &model.segments {
        chart
            .draw_series(LineSeries::new(segment.iter().copied(), LINE_COLOR.stroke_width(2)))
            .map_err(drawing)?;
    }

    chart
        .draw_series(
            model
                .markers()
                .map(|point| Circle::new(point, MARKER_RADIUS, LINE_COLOR.filled())),
        )
        .map_err(drawing)?;

    root.present().map_err(drawing)?;
    Ok(())
}

fn drawing<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}
