/// Grouped bar chart of monthly means, one group per year.
///
/// The x axis is integer: each year owns `GROUP_UNITS` units, one empty unit
/// on each side and one unit per month in between. The month legend is
/// drawn by plotters in a strip to the right of the axes.

use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use super::axes;
use super::fonts;
use super::palette::{category_color, AXIS_COLOR};
use super::{render_err, Area, Canvas, Figure, FigureStyle, Legend, Panel};
use crate::analysis::monthly_averages;
use crate::logging::Stage;
use crate::model::{FilteredDataset, Result, MONTH_NAMES};

pub const TITLE: &str = "Average Daily Page Views per Month";
pub const X_LABEL: &str = "Years";
pub const Y_LABEL: &str = "Average Page Views";
pub const LEGEND_TITLE: &str = "Months";

/// Axis units owned by one year group.
pub const GROUP_UNITS: i32 = MONTH_NAMES.len() as i32 + 2;
const LEGEND_WIDTH: u32 = 160;
const SWATCH_HALF_HEIGHT: i32 = 5;
const SWATCH_WIDTH: i32 = 12;

/// Axis units covered by the bar for `month` (0-based) in year group `slot`.
pub fn bar_units(slot: usize, month: usize) -> Range<i32> {
    let start = slot as i32 * GROUP_UNITS + 1 + month as i32;
    start..start + 1
}

/// Draw one bar per (year, month) mean, grouped by year with months in
/// calendar order, and write it to `path`. Months without data leave a gap.
pub fn draw_bar_plot(data: &FilteredDataset, path: &Path, style: &FigureStyle) -> Result<Figure> {
    fonts::ensure_font()?;

    let averages = monthly_averages(data);
    let years = averages.years();
    let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let year_label = |x: &i32| axes::category_label(&labels, GROUP_UNITS, *x);

    let x_range = 0..years.len().max(1) as i32 * GROUP_UNITS;
    let y_range = axes::zero_based_range(averages.max_value());

    let mut canvas = Canvas::new(style.size);
    let plot_area = {
        let root = canvas.drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let (plot_root, legend_root) = root.split_horizontally(style.size.0.saturating_sub(LEGEND_WIDTH));

        let mut chart = ChartBuilder::on(&plot_root)
            .caption(TITLE, axes::title_style())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(
                x_range.with_key_points(axes::category_ticks(years.len(), GROUP_UNITS)),
                y_range,
            )
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .x_label_formatter(&year_label)
            .label_style(axes::tick_style())
            .axis_desc_style(axes::label_style())
            .draw()
            .map_err(render_err)?;

        for month in 0..MONTH_NAMES.len() {
            let color = category_color(month);
            let bars: Vec<_> = averages
                .rows()
                .iter()
                .enumerate()
                .filter_map(|(slot, (_, means))| means[month].map(|mean| (slot, mean)))
                .map(|(slot, mean)| {
                    let span = bar_units(slot, month);
                    Rectangle::new([(span.start, 0.0), (span.end, mean)], color.filled())
                })
                .collect();
            chart.draw_series(bars).map_err(render_err)?;
        }

        draw_month_legend(&legend_root)?;

        let plot_area = chart.plotting_area().get_pixel_range();
        root.present().map_err(render_err)?;
        plot_area
    };

    let panel = Panel {
        title: TITLE.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        categories: labels.clone(),
        points: averages.len(),
        plot_area,
    };
    let legend = Legend {
        title: LEGEND_TITLE.to_string(),
        entries: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
    };
    let figure = canvas.into_figure(path, vec![panel], Some(legend));
    figure.save()?;

    log::info!(
        target: Stage::Bar.target(),
        "Wrote bar plot of {} monthly means across {} years to {}",
        averages.len(),
        years.len(),
        path.display()
    );
    Ok(figure)
}

/// All twelve months with their swatches, under a "Months" heading, whether
/// or not the data has them.
fn draw_month_legend(area: &Area<'_>) -> Result<()> {
    let mut legend = ChartBuilder::on(area)
        .margin_top(50)
        .margin_right(15)
        .build_cartesian_2d(0..1, 0..1)
        .map_err(render_err)?;

    // A label with no swatch renders as the heading row.
    legend
        .draw_series(std::iter::empty::<Rectangle<(i32, i32)>>())
        .map_err(render_err)?
        .label(LEGEND_TITLE);

    for (month, name) in MONTH_NAMES.iter().enumerate() {
        let color = category_color(month);
        legend
            .draw_series(std::iter::empty::<Rectangle<(i32, i32)>>())
            .map_err(render_err)?
            .label(*name)
            .legend(move |(x, y)| {
                Rectangle::new(
                    [(x, y - SWATCH_HALF_HEIGHT), (x + SWATCH_WIDTH, y + SWATCH_HALF_HEIGHT)],
                    color.filled(),
                )
            });
    }

    legend
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(axes::tick_style())
        .background_style(WHITE)
        .border_style(AXIS_COLOR)
        .draw()
        .map_err(render_err)
}
