/// Line plot of the cleaned daily series.

use chrono::{DateTime, NaiveDateTime};
use plotters::prelude::*;
use std::path::Path;

use super::axes;
use super::fonts;
use super::palette::LINE_COLOR;
use super::{render_err, Canvas, Figure, FigureStyle, Panel};
use crate::logging::Stage;
use crate::model::{FilteredDataset, Result};

pub const TITLE: &str = "Forum Page Views";
pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Page Views";

const SECONDS_PER_DAY: i64 = 86_400;
const MAX_DATE_TICKS: usize = 8;

/// Seconds since the Unix epoch.
fn seconds(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp()
}

/// `YYYY-MM` tick label for an x position in epoch seconds.
fn month_label(x: &i64) -> String {
    DateTime::from_timestamp(*x, 0)
        .map(|dt| dt.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Draw value against date as one connected line, in dataset order, and
/// write it to `path`.
pub fn draw_line_plot(data: &FilteredDataset, path: &Path, style: &FigureStyle) -> Result<Figure> {
    fonts::ensure_font()?;

    let points: Vec<(i64, f64)> = data
        .observations()
        .iter()
        .map(|obs| (seconds(obs.timestamp), obs.value))
        .collect();

    let x_range = match (points.first(), points.last()) {
        (Some(first), Some(last)) if first.0 < last.0 => first.0..last.0,
        (Some(only), _) => (only.0 - SECONDS_PER_DAY)..(only.0 + SECONDS_PER_DAY),
        _ => 0..SECONDS_PER_DAY,
    };
    let y_range = axes::padded_range(points.iter().map(|(_, v)| *v));

    let x_ticks: Vec<i64> = match (data.observations().first(), data.observations().last()) {
        (Some(first), Some(last)) => {
            axes::month_ticks(first.timestamp.date(), last.timestamp.date(), MAX_DATE_TICKS)
                .into_iter()
                .filter_map(|d| d.and_hms_opt(0, 0, 0))
                .map(seconds)
                .collect()
        }
        _ => Vec::new(),
    };

    let mut canvas = Canvas::new(style.size);
    let plot_area = {
        let root = canvas.drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, axes::title_style())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range.with_key_points(x_ticks), y_range)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .x_label_formatter(&month_label)
            .label_style(axes::tick_style())
            .axis_desc_style(axes::label_style())
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(1)))
            .map_err(render_err)?;

        let plot_area = chart.plotting_area().get_pixel_range();
        root.present().map_err(render_err)?;
        plot_area
    };

    let panel = Panel {
        title: TITLE.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        categories: Vec::new(),
        points: points.len(),
        plot_area,
    };
    let figure = canvas.into_figure(path, vec![panel], None);
    figure.save()?;

    log::info!(
        target: Stage::Line.target(),
        "Wrote line plot of {} points to {}",
        points.len(),
        path.display()
    );
    Ok(figure)
}
