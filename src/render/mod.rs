/// Chart rendering.
///
/// Each renderer takes a `FilteredDataset`, rasterizes one figure into an
/// in-memory RGB buffer with `plotters`, writes it as PNG, and returns the
/// `Figure` so callers and tests can inspect what was drawn.
///
/// Submodules:
/// - `line`: full series as a single line.
/// - `bar`: monthly means grouped by year.
/// - `boxplot`: yearly (trend) and monthly (seasonality) distributions.
/// - `axes`: ranges, tick positions and text styles.
/// - `fonts`: one-time font registration, with a bundled fallback.
/// - `palette`: per-category colours.
/// - `png_out`: PNG encoding of the pixel buffer.

pub mod axes;
pub mod bar;
pub mod boxplot;
pub mod fonts;
pub mod line;
pub mod palette;
pub mod png_out;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::model::{PageViewError, Result};

pub use bar::draw_bar_plot;
pub use boxplot::draw_box_plot;
pub use line::draw_line_plot;

pub(crate) type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> PageViewError {
    PageViewError::Render(err.to_string())
}

// ---------------------------------------------------------------------------
// Figure description
// ---------------------------------------------------------------------------

/// Pixel size of one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureStyle {
    pub size: (u32, u32),
}

impl FigureStyle {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }
}

/// One set of axes within a figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Categorical x-axis labels in display order; empty for continuous axes.
    pub categories: Vec<String>,
    /// Number of data values drawn on these axes.
    pub points: usize,
    /// Pixel columns and rows of the plotting area inside the axes.
    pub plot_area: (Range<i32>, Range<i32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<String>,
}

/// A rendered figure: where it was written, what it shows, and its pixels.
#[derive(Debug, Clone)]
pub struct Figure {
    path: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    panels: Vec<Panel>,
    legend: Option<Legend>,
}

impl Figure {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major RGB bytes, three per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Encode the pixels as PNG at `path()`, replacing any existing file.
    pub fn save(&self) -> Result<()> {
        png_out::write_png(&self.path, self.width, self.height, &self.pixels)
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Owned RGB buffer that plotters draws into.
pub(crate) struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub(crate) fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; width as usize * height as usize * 3],
        }
    }

    pub(crate) fn drawing_area(&mut self) -> Area<'_> {
        BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height)).into_drawing_area()
    }

    pub(crate) fn into_figure(
        self,
        path: &Path,
        panels: Vec<Panel>,
        legend: Option<Legend>,
    ) -> Figure {
        Figure {
            path: path.to_path_buf(),
            width: self.width,
            height: self.height,
            pixels: self.pixels,
            panels,
            legend,
        }
    }
}
