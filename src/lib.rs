//! Exploratory analysis of daily forum page views.
//!
//! One run loads the `date`/`value` CSV, trims the top and bottom 2.5% of
//! values, and writes three figures: the full series as a line, monthly
//! means grouped by year as bars, and yearly and monthly distributions as
//! box plots.
//!
//! Modules:
//! - `model`: observations, datasets, month constants, errors.
//! - `config`: optional `pageviews.toml` settings.
//! - `logging`: stage-tagged console/file logger behind the `log` facade.
//! - `ingest`: CSV loading.
//! - `analysis`: outlier filter, groupings, box statistics.
//! - `render`: the three figures.
//! - `report`: summary of a completed run.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;

use std::path::PathBuf;

pub use config::Config;
pub use model::{Dataset, FilteredDataset, Observation, PageViewError, PercentileBounds, Result};
pub use render::{draw_bar_plot, draw_box_plot, draw_line_plot, Figure, FigureStyle};
pub use report::RunSummary;

use logging::{log_stage_failure, Stage};

/// Load and clean the configured input.
pub fn prepare(config: &Config) -> Result<(Dataset, FilteredDataset)> {
    let dataset = ingest::load_dataset(&config.input_path, config.delimiter_byte())
        .inspect_err(|e| log_stage_failure(Stage::Load, "Loading input", e))?;
    let filtered = analysis::filter_outliers(&dataset, config.lower_quantile, config.upper_quantile);
    Ok((dataset, filtered))
}

/// Run the whole pipeline once: load, filter, then render the line, bar and
/// box figures in that order. Any failure stops the run.
pub fn run(config: &Config) -> Result<RunSummary> {
    config
        .validate()
        .inspect_err(|e| log_stage_failure(Stage::System, "Validating configuration", e))?;
    let (dataset, filtered) = prepare(config)?;

    render::fonts::load_font(&config.figure.font_paths)
        .inspect_err(|e| log_stage_failure(Stage::System, "Loading fonts", e))?;
    let figures = &config.figure;
    let out = &config.output;

    let line = draw_line_plot(&filtered, &out.line_plot, &FigureStyle::new(figures.line_size))
        .inspect_err(|e| log_stage_failure(Stage::Line, "Line plot", e))?;
    let bar = draw_bar_plot(&filtered, &out.bar_plot, &FigureStyle::new(figures.bar_size))
        .inspect_err(|e| log_stage_failure(Stage::Bar, "Bar plot", e))?;
    let boxes = draw_box_plot(&filtered, &out.box_plot, &FigureStyle::new(figures.box_size))
        .inspect_err(|e| log_stage_failure(Stage::Box, "Box plot", e))?;

    let outputs: Vec<PathBuf> = [line, bar, boxes]
        .iter()
        .map(|f| f.path().to_path_buf())
        .collect();
    let summary = RunSummary::new(&config.input_path, &dataset, &filtered, outputs);
    summary.log();

    if let Some(path) = &out.report_path {
        summary
            .write_json(path)
            .inspect_err(|e| log_stage_failure(Stage::System, "Writing run report", e))?;
    }
    Ok(summary)
}
