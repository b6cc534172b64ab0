/// Structured logging for the page-view pipeline.
///
/// Provides stage-tagged logging with timestamps and severity levels,
/// installed behind the `log` facade so library code just uses
/// `log::info!(target: Stage::Load.target(), ...)`. Supports both console
/// output and an append-only log file.

use chrono::Utc;
use log::{Level, LevelFilter, Metadata, Record};
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::PageViewError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LogLevel::Error,
            Level::Warn => LogLevel::Warning,
            Level::Info => LogLevel::Info,
            Level::Debug | Level::Trace => LogLevel::Debug,
        }
    }
}

impl LogLevel {
    fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Filter,
    Line,
    Bar,
    Box,
    System,
}

impl Stage {
    /// Log target carrying this stage through the `log` facade.
    pub const fn target(self) -> &'static str {
        match self {
            Stage::Load => "LOAD",
            Stage::Filter => "FILTER",
            Stage::Line => "LINE",
            Stage::Bar => "BAR",
            Stage::Box => "BOX",
            Stage::System => "SYS",
        }
    }

    /// Targets that are not stage tags (e.g. module paths from dependencies)
    /// are reported as `SYS`.
    pub fn from_target(target: &str) -> Stage {
        match target {
            "LOAD" => Stage::Load,
            "FILTER" => Stage::Filter,
            "LINE" => Stage::Line,
            "BAR" => Stage::Bar,
            "BOX" => Stage::Box,
            _ => Stage::System,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// The input data or configuration is at fault; fix the file and rerun.
    Input,
    /// The environment is at fault: filesystem, fonts, image encoding.
    Environment,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Input => write!(f, "INPUT"),
            FailureType::Environment => write!(f, "ENVIRONMENT"),
        }
    }
}

pub fn classify_failure(err: &PageViewError) -> FailureType {
    if err.is_input_error() {
        FailureType::Input
    } else {
        FailureType::Environment
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<PathBuf>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    pub fn new(min_level: LogLevel, log_file: Option<PathBuf>, console_timestamps: bool) -> Self {
        Self {
            min_level,
            log_file,
            console_timestamps,
        }
    }

    /// Formats the line written to the log file (and to the console when
    /// timestamps are enabled).
    pub fn format_entry(level: LogLevel, stage: Stage, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        format!("{} {} {}: {}", timestamp, level, stage, message)
    }

    fn write(&self, level: LogLevel, stage: Stage, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, stage, message);

        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("   {}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}: {}", stage, message),
                LogLevel::Warning => eprintln!("   ⚠ {}: {}", stage, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path.display(), e);
            }
        }
    }

    fn append_to_file(path: &Path, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        LogLevel::from(metadata.level()) >= self.min_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stage = Stage::from_target(record.target());
        self.write(
            LogLevel::from(record.level()),
            stage,
            &record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Install the process-wide logger. Returns `false` when a logger was
/// already installed, in which case the existing one stays active.
pub fn init_logger(min_level: LogLevel, log_file: Option<&Path>, console_timestamps: bool) -> bool {
    let logger = Logger::new(min_level, log_file.map(Path::to_path_buf), console_timestamps);
    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => {
            log::set_max_level(min_level.as_filter());
            true
        }
        Err(_) => false,
    }
}

/// Log a stage failure together with its classification.
pub fn log_stage_failure(stage: Stage, operation: &str, err: &PageViewError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);
    log::error!(target: stage.target(), "{}", message);
}

/// Log how many observations survived outlier removal.
pub fn log_filter_summary(total: usize, kept: usize) {
    let removed = total.saturating_sub(kept);
    let message = format!(
        "Outlier filter complete: {}/{} kept, {} removed",
        kept, total, removed
    );

    if total == 0 {
        log::warn!(target: Stage::Filter.target(), "No observations loaded; figures will be empty");
    } else if kept == 0 {
        log::warn!(target: Stage::Filter.target(), "{}", message);
    } else {
        log::info!(target: Stage::Filter.target(), "{}", message);
    }
}
