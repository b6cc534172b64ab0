/// Delimited-file loader for daily page-view exports.
///
/// Expects a header row with at least a `date` and a `value` column (any
/// order, case-insensitive, extra columns ignored). Every data row must parse;
/// the first bad cell aborts the load with its line number and column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::logging::Stage;
use crate::model::{Dataset, Observation, PageViewError, Result};

pub const DATE_COLUMN: &str = "date";
pub const VALUE_COLUMN: &str = "value";

/// Datetime layouts accepted after RFC 3339 has been tried.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

// ============================================================================
// Loading
// ============================================================================

/// Read and parse the file at `path`.
pub fn load_dataset(path: &Path, delimiter: u8) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| PageViewError::io(path, e))?;
    let dataset = parse_dataset(file, delimiter)?;

    log::info!(
        target: Stage::Load.target(),
        "Loaded {} observations from {}",
        dataset.len(),
        path.display()
    );
    if let (Some(first), Some(last)) = (dataset.observations().first(), dataset.observations().last()) {
        log::debug!(
            target: Stage::Load.target(),
            "Series spans {} to {}",
            first.timestamp.date(),
            last.timestamp.date()
        );
    }
    Ok(dataset)
}

/// Parse delimited text into a chronologically ordered `Dataset`.
///
/// A header-only input yields an empty dataset.
pub fn parse_dataset<R: Read>(input: R, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, DATE_COLUMN)?;
    let value_idx = find_column(&headers, VALUE_COLUMN)?;

    let mut observations = Vec::new();
    let mut negative = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, so the n-th data row sits on line n + 2 unless
        // the reader reports an exact position.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row + 2);

        let date_text = record.get(date_idx).unwrap_or_default();
        let timestamp = parse_timestamp(date_text).ok_or_else(|| PageViewError::Parse {
            line,
            column: DATE_COLUMN.to_string(),
            message: format!("'{}' is not a recognised date", date_text),
        })?;

        let value = parse_value(record.get(value_idx).unwrap_or_default()).map_err(|message| {
            PageViewError::Parse {
                line,
                column: VALUE_COLUMN.to_string(),
                message,
            }
        })?;

        if value < 0.0 {
            negative += 1;
        }
        observations.push(Observation::new(timestamp, value));
    }

    let dataset = Dataset::from_observations(observations);

    if negative > 0 {
        log::warn!(
            target: Stage::Load.target(),
            "{} observations have negative page-view counts",
            negative
        );
    }
    let duplicates = count_duplicate_timestamps(&dataset);
    if duplicates > 0 {
        log::warn!(
            target: Stage::Load.target(),
            "{} observations share a timestamp with an earlier row; keeping both",
            duplicates
        );
    }

    Ok(dataset)
}

// ============================================================================
// Field Parsing
// ============================================================================

/// Parse a calendar date or datetime.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fff]]`, the same with a `T`
/// separator, and RFC 3339 with an offset (normalised to UTC). Returns
/// `None` for anything else.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_value(text: &str) -> std::result::Result<f64, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("value is empty".to_string());
    }
    let value: f64 = text
        .parse()
        .map_err(|_| format!("'{}' is not a number", text))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", text));
    }
    Ok(value)
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| PageViewError::MissingColumn(name.to_string()))
}

fn count_duplicate_timestamps(dataset: &Dataset) -> usize {
    dataset
        .observations()
        .windows(2)
        .filter(|pair| pair[0].timestamp == pair[1].timestamp)
        .count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parse(text: &str) -> Result<Dataset> {
        parse_dataset(text.as_bytes(), b',')
    }

    #[test]
    fn test_parses_date_value_rows() {
        let dataset = parse("date,value\n2016-05-09,1201\n2016-05-10,2329\n")
            .expect("well-formed input should parse");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.values(), vec![1201.0, 2329.0]);
        assert_eq!(dataset.observations()[0].timestamp.day(), 9);
    }

    #[test]
    fn test_rows_are_ordered_chronologically() {
        let dataset = parse("date,value\n2016-05-11,3\n2016-05-09,1\n2016-05-10,2\n")
            .expect("out-of-order input should still parse");
        assert_eq!(dataset.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_header_only_input_is_empty_dataset() {
        let dataset = parse("date,value\n").expect("header-only input is not an error");
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_columns_found_by_name_in_any_order() {
        let dataset = parse("site,Value,DATE\nforum,15,2019-12-03\n")
            .expect("column lookup should be by name");
        assert_eq!(dataset.values(), vec![15.0]);
        assert_eq!(dataset.observations()[0].year(), 2019);
    }

    #[test]
    fn test_missing_value_column_is_reported() {
        let result = parse("date,views\n2019-12-03,15\n");
        assert!(
            matches!(result, Err(PageViewError::MissingColumn(ref c)) if c == "value"),
            "expected MissingColumn(value), got {:?}",
            result
        );
    }

    #[test]
    fn test_bad_date_reports_line_and_column() {
        let result = parse("date,value\n2019-12-03,15\nyesterday,20\n");
        match result {
            Err(PageViewError::Parse { line, column, message }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "date");
                assert!(message.contains("yesterday"));
            }
            other => panic!("expected a date parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value_reports_line_and_column() {
        let result = parse("date,value\n2019-12-03,lots\n");
        match result {
            Err(PageViewError::Parse { line, column, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "value");
            }
            other => panic!("expected a value parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_non_finite_values_are_rejected() {
        assert!(matches!(
            parse("date,value\n2019-12-03,\n"),
            Err(PageViewError::Parse { .. })
        ));
        assert!(matches!(
            parse("date,value\n2019-12-03,NaN\n"),
            Err(PageViewError::Parse { .. })
        ));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let dataset = parse_dataset("date;value\n2018-02-01;7.5\n".as_bytes(), b';')
            .expect("custom delimiter should parse");
        assert_eq!(dataset.values(), vec![7.5]);
    }

    #[test]
    fn test_duplicate_timestamps_are_kept() {
        let dataset = parse("date,value\n2018-02-01,1\n2018-02-01,2\n").expect("duplicates parse");
        assert_eq!(dataset.len(), 2);
        assert_eq!(count_duplicate_timestamps(&dataset), 1);
    }

    #[test]
    fn test_timestamp_formats() {
        let plain = parse_timestamp("2016-05-09").expect("plain date");
        assert_eq!((plain.year(), plain.month(), plain.day()), (2016, 5, 9));
        assert_eq!(plain.hour(), 0);

        let spaced = parse_timestamp("2016-05-09 13:45:00").expect("space separated datetime");
        assert_eq!(spaced.hour(), 13);

        let t_sep = parse_timestamp("2016-05-09T13:45:00.250").expect("T separated datetime");
        assert_eq!(t_sep.minute(), 45);

        // 08:00 at -05:00 is 13:00 UTC.
        let offset = parse_timestamp("2016-05-09T08:00:00-05:00").expect("rfc3339 datetime");
        assert_eq!(offset.hour(), 13);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("09/05/2016").is_none());
        assert!(parse_timestamp("2016-13-01").is_none());
    }
}
