/// Core data types for the forum page-view analysis.
///
/// This module defines the shared domain model imported by all other modules:
/// observations, the loaded and cleaned datasets, the calendar constants used
/// for display ordering, and the crate error type. It contains no I/O.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Calendar ordering
// ---------------------------------------------------------------------------

/// Full month names in calendar order. Bar chart columns and legend entries
/// always follow this order, never data-encounter or alphabetical order.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Abbreviated month names in calendar order, used as box plot categories.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// A single daily page-view sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Zero-based month index (0 = January), suitable for indexing
    /// `MONTH_NAMES` and `MONTH_ABBREVIATIONS`.
    pub fn month_index(&self) -> usize {
        self.timestamp.month0() as usize
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month_index()]
    }

    pub fn month_abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[self.month_index()]
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// The full series as loaded, ordered chronologically. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Builds a dataset ordered by timestamp. The sort is stable, so rows
    /// sharing a timestamp keep their input order.
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|obs| obs.timestamp);
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Inclusive value bounds used by the outlier filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBounds {
    pub lower: f64,
    pub upper: f64,
}

impl PercentileBounds {
    /// Both ends are inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// A dataset with outliers removed, in the same relative order as its source.
///
/// Produced by `analysis::outliers::filter_outliers`. Every renderer takes
/// one of these as its only data input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredDataset {
    observations: Vec<Observation>,
    bounds: Option<PercentileBounds>,
    removed: usize,
}

impl FilteredDataset {
    pub(crate) fn new(
        observations: Vec<Observation>,
        bounds: Option<PercentileBounds>,
        removed: usize,
    ) -> Self {
        Self {
            observations,
            bounds,
            removed,
        }
    }

    /// Wraps an already-clean dataset without trimming anything.
    pub fn without_filtering(dataset: Dataset) -> Self {
        Self::new(dataset.observations, None, 0)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The bounds the data was filtered with; `None` when no filtering ran
    /// (empty input or `without_filtering`).
    pub fn bounds(&self) -> Option<PercentileBounds> {
        self.bounds
    }

    /// Number of source observations dropped as outliers.
    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct calendar years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.observations.iter().map(Observation::year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading, cleaning, or rendering page views.
#[derive(Debug, Error)]
pub enum PageViewError {
    /// A file could not be opened, read, or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The delimited input could not be tokenized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A cell could not be converted to the expected type.
    #[error("Parse error at line {line}, column '{column}': {message}")]
    Parse {
        line: usize,
        column: String,
        message: String,
    },
    /// The header row lacks a required column.
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    /// The configuration file is unreadable or holds invalid values.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Drawing a figure failed.
    #[error("Render error: {0}")]
    Render(String),
    /// Writing the PNG stream failed.
    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),
    /// The run report could not be serialized.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl PageViewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PageViewError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure comes from the data or configuration supplied by
    /// the user rather than from the environment (filesystem, fonts, encoder).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PageViewError::Csv(_)
                | PageViewError::Parse { .. }
                | PageViewError::MissingColumn(_)
                | PageViewError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PageViewError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid test date")
    }

    #[test]
    fn test_month_constants_are_in_calendar_order() {
        assert_eq!(MONTH_NAMES[0], "January");
        assert_eq!(MONTH_NAMES[11], "December");
        for (name, abbr) in MONTH_NAMES.iter().zip(MONTH_ABBREVIATIONS.iter()) {
            assert!(
                name.starts_with(abbr),
                "abbreviation '{}' does not match month '{}'",
                abbr,
                name
            );
        }
    }

    #[test]
    fn test_observation_calendar_fields() {
        let obs = Observation::new(at(2017, 9, 14), 42.0);
        assert_eq!(obs.year(), 2017);
        assert_eq!(obs.month_index(), 8);
        assert_eq!(obs.month_name(), "September");
        assert_eq!(obs.month_abbreviation(), "Sep");
    }

    #[test]
    fn test_dataset_orders_by_timestamp_and_keeps_ties_stable() {
        let dataset = Dataset::from_observations(vec![
            Observation::new(at(2020, 3, 1), 3.0),
            Observation::new(at(2020, 1, 1), 1.0),
            Observation::new(at(2020, 3, 1), 4.0),
            Observation::new(at(2020, 2, 1), 2.0),
        ]);
        assert_eq!(dataset.values(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = PercentileBounds {
            lower: 10.0,
            upper: 20.0,
        };
        assert!(bounds.contains(10.0));
        assert!(bounds.contains(20.0));
        assert!(!bounds.contains(9.999));
        assert!(!bounds.contains(20.001));
    }

    #[test]
    fn test_years_are_distinct_and_ascending() {
        let filtered = FilteredDataset::without_filtering(Dataset::from_observations(vec![
            Observation::new(at(2019, 5, 1), 1.0),
            Observation::new(at(2017, 5, 1), 1.0),
            Observation::new(at(2019, 6, 1), 1.0),
            Observation::new(at(2018, 5, 1), 1.0),
        ]));
        assert_eq!(filtered.years(), vec![2017, 2018, 2019]);
    }

    #[test]
    fn test_input_error_classification() {
        let parse = PageViewError::Parse {
            line: 3,
            column: "value".to_string(),
            message: "not a number".to_string(),
        };
        assert!(parse.is_input_error());
        assert!(PageViewError::MissingColumn("date".to_string()).is_input_error());

        let io = PageViewError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!io.is_input_error());
        assert!(io.to_string().contains("missing.csv"));
    }
}
