/// Run configuration.
///
/// Every setting has a default, so the pipeline runs with no configuration
/// file at all. When `pageviews.toml` exists in the working directory it
/// overrides any subset of the defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::outliers::{DEFAULT_LOWER_QUANTILE, DEFAULT_UPPER_QUANTILE};
use crate::logging::LogLevel;
use crate::model::{PageViewError, Result};

/// File looked up in the working directory by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "pageviews.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_lower_quantile")]
    pub lower_quantile: f64,
    #[serde(default = "default_upper_quantile")]
    pub upper_quantile: f64,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub figure: FigureSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the three images (and the optional JSON report) are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    #[serde(default = "default_line_plot")]
    pub line_plot: PathBuf,
    #[serde(default = "default_bar_plot")]
    pub bar_plot: PathBuf,
    #[serde(default = "default_box_plot")]
    pub box_plot: PathBuf,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

/// Pixel sizes and text settings for the rendered figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureSettings {
    #[serde(default = "default_line_size")]
    pub line_size: (u32, u32),
    #[serde(default = "default_bar_size")]
    pub bar_size: (u32, u32),
    #[serde(default = "default_box_size")]
    pub box_size: (u32, u32),
    /// TrueType fonts to try, in order, before the bundled DejaVu Sans.
    #[serde(default)]
    pub font_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub timestamps: bool,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("fcc-forum-pageviews.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_lower_quantile() -> f64 {
    DEFAULT_LOWER_QUANTILE
}

fn default_upper_quantile() -> f64 {
    DEFAULT_UPPER_QUANTILE
}

fn default_line_plot() -> PathBuf {
    PathBuf::from("line_plot.png")
}

fn default_bar_plot() -> PathBuf {
    PathBuf::from("bar_plot.png")
}

fn default_box_plot() -> PathBuf {
    PathBuf::from("box_plot.png")
}

fn default_line_size() -> (u32, u32) {
    (1000, 600)
}

fn default_bar_size() -> (u32, u32) {
    (1000, 600)
}

fn default_box_size() -> (u32, u32) {
    (1800, 600)
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            line_plot: default_line_plot(),
            bar_plot: default_bar_plot(),
            box_plot: default_box_plot(),
            report_path: None,
        }
    }
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            line_size: default_line_size(),
            bar_size: default_bar_size(),
            box_size: default_box_size(),
            font_paths: Vec::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
            timestamps: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            delimiter: default_delimiter(),
            lower_quantile: default_lower_quantile(),
            upper_quantile: default_upper_quantile(),
            output: OutputSettings::default(),
            figure: FigureSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| PageViewError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PageViewError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Rejects settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(self.lower_quantile) || !in_unit(self.upper_quantile) {
            return Err(PageViewError::Config(format!(
                "quantiles must lie in [0, 1], got {} and {}",
                self.lower_quantile, self.upper_quantile
            )));
        }
        if self.lower_quantile > self.upper_quantile {
            return Err(PageViewError::Config(format!(
                "lower_quantile {} exceeds upper_quantile {}",
                self.lower_quantile, self.upper_quantile
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(PageViewError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        let sizes = [
            ("line_size", self.figure.line_size),
            ("bar_size", self.figure.bar_size),
            ("box_size", self.figure.box_size),
        ];
        for (name, (width, height)) in sizes {
            if width < 200 || height < 150 {
                return Err(PageViewError::Config(format!(
                    "figure.{} must be at least 200x150 pixels, got {}x{}",
                    name, width, height
                )));
            }
        }
        Ok(())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
