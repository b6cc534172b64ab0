/// Side-by-side box plots: distribution per year (trend) and per calendar
/// month pooled across years (seasonality).

use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use super::axes;
use super::fonts;
use super::palette::{category_color, OUTLINE_COLOR};
use super::{render_err, Area, Canvas, Figure, FigureStyle, Panel};
use crate::analysis::{monthly_groups, yearly_groups, BoxStats, CategoryGroup};
use crate::logging::Stage;
use crate::model::{FilteredDataset, Result};

pub const YEAR_TITLE: &str = "Year-wise Box Plot (Trend)";
pub const YEAR_X_LABEL: &str = "Year";
pub const MONTH_TITLE: &str = "Month-wise Box Plot (Seasonality)";
pub const MONTH_X_LABEL: &str = "Month";
pub const Y_LABEL: &str = "Page Views";

/// Axis units owned by one category; its box is centred in the slot.
const SLOT_UNITS: i32 = 20;
const BOX_HALF_WIDTH: i32 = 6;
const CAP_HALF_WIDTH: i32 = 3;
const FLIER_RADIUS: u32 = 3;

type BoxChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<WithKeyPoints<RangedCoordi32>, RangedCoordf64>>;

/// Draw the yearly and monthly box plots in one figure, left and right, and
/// write it to `path`.
///
/// Every group keeps its slot on the category axis; a group with no values
/// draws no box.
pub fn draw_box_plot(data: &FilteredDataset, path: &Path, style: &FigureStyle) -> Result<Figure> {
    fonts::ensure_font()?;

    let by_year = yearly_groups(data);
    let by_month = monthly_groups(data);

    let mut canvas = Canvas::new(style.size);
    let (year_area, month_area) = {
        let root = canvas.drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let halves = root.split_evenly((1, 2));

        let year_area = draw_panel(&halves[0], &by_year, YEAR_TITLE, YEAR_X_LABEL)?;
        let month_area = draw_panel(&halves[1], &by_month, MONTH_TITLE, MONTH_X_LABEL)?;

        root.present().map_err(render_err)?;
        (year_area, month_area)
    };

    let panels = vec![
        describe(&by_year, YEAR_TITLE, YEAR_X_LABEL, year_area),
        describe(&by_month, MONTH_TITLE, MONTH_X_LABEL, month_area),
    ];
    let figure = canvas.into_figure(path, panels, None);
    figure.save()?;

    log::info!(
        target: Stage::Box.target(),
        "Wrote box plots for {} years and {} months to {}",
        by_year.len(),
        by_month.iter().filter(|g| !g.values.is_empty()).count(),
        path.display()
    );
    Ok(figure)
}

fn describe(
    groups: &[CategoryGroup],
    title: &str,
    x_label: &str,
    plot_area: (Range<i32>, Range<i32>),
) -> Panel {
    Panel {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: Y_LABEL.to_string(),
        categories: groups.iter().map(|g| g.label.clone()).collect(),
        points: groups.iter().map(|g| g.values.len()).sum(),
        plot_area,
    }
}

/// One set of axes with its own caption, one box per non-empty group.
/// Returns the pixel extent of the plotting area.
fn draw_panel(
    area: &Area<'_>,
    groups: &[CategoryGroup],
    title: &str,
    x_label: &str,
) -> Result<(Range<i32>, Range<i32>)> {
    let stats: Vec<Option<BoxStats>> = groups
        .iter()
        .map(|g| BoxStats::from_values(&g.values))
        .collect();

    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let category = |x: &i32| axes::category_label(&labels, SLOT_UNITS, *x);

    let x_range = 0..groups.len().max(1) as i32 * SLOT_UNITS;
    let y_range = axes::padded_range(stats.iter().flatten().flat_map(|s| {
        let (low, high) = s.extent();
        [low, high]
    }));

    let mut chart = ChartBuilder::on(area)
        .caption(title, axes::title_style())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            x_range.with_key_points(axes::category_ticks(groups.len(), SLOT_UNITS)),
            y_range,
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_label)
        .y_desc(Y_LABEL)
        .x_label_formatter(&category)
        .label_style(axes::tick_style())
        .axis_desc_style(axes::label_style())
        .draw()
        .map_err(render_err)?;

    for (i, stat) in stats.iter().enumerate() {
        let Some(stat) = stat else { continue };
        let center = i as i32 * SLOT_UNITS + SLOT_UNITS / 2;
        draw_box(&mut chart, center, stat, category_color(i))?;
    }
    Ok(chart.plotting_area().get_pixel_range())
}

fn draw_box(chart: &mut BoxChart<'_, '_>, center: i32, stat: &BoxStats, color: RGBColor) -> Result<()> {
    let left = center - BOX_HALF_WIDTH;
    let right = center + BOX_HALF_WIDTH;
    let outline = OUTLINE_COLOR.stroke_width(1);

    let whiskers = [
        vec![(center, stat.whisker_low), (center, stat.q1)],
        vec![(center, stat.q3), (center, stat.whisker_high)],
        vec![(center - CAP_HALF_WIDTH, stat.whisker_low), (center + CAP_HALF_WIDTH, stat.whisker_low)],
        vec![(center - CAP_HALF_WIDTH, stat.whisker_high), (center + CAP_HALF_WIDTH, stat.whisker_high)],
    ];
    chart
        .draw_series(whiskers.into_iter().map(|line| PathElement::new(line, outline)))
        .map_err(render_err)?;

    chart
        .draw_series([
            Rectangle::new([(left, stat.q1), (right, stat.q3)], color.mix(0.8).filled()),
            Rectangle::new([(left, stat.q1), (right, stat.q3)], outline),
        ])
        .map_err(render_err)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(left, stat.median), (right, stat.median)],
            OUTLINE_COLOR.stroke_width(2),
        )))
        .map_err(render_err)?;

    chart
        .draw_series(
            stat.fliers
                .iter()
                .map(|v| Circle::new((center, *v), FLIER_RADIUS, outline)),
        )
        .map_err(render_err)?;
    Ok(())
}
