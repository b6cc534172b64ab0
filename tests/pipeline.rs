/// End-to-end tests for the page-view pipeline.
///
/// These tests verify:
/// 1. A full run writes all three figures and the JSON report
/// 2. Two runs over the same input produce byte-identical images
/// 3. Header-only input still renders every figure
/// 4. Input problems surface as the matching error variant
/// 5. Unreadable configured fonts fall back to the bundled one
///
/// Every test works inside its own temporary directory; no fixture files
/// are checked in.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use forum_pageviews::analysis::filter_outliers;
use forum_pageviews::ingest::parse_dataset;
use forum_pageviews::{run, Config, PageViewError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Daily rows from 2016-05-09 for `days` days, with a weekly cycle, a slow
/// upward trend, and a few spikes far outside the normal range.
fn fixture_csv(days: i64) -> String {
    let start = NaiveDate::from_ymd_opt(2016, 5, 9).expect("valid start date");
    let mut csv = String::from("date,value\n");
    for day in 0..days {
        let date = start + Duration::days(day);
        let value = if day % 97 == 13 {
            1_000_000 + day
        } else if day % 89 == 7 {
            day % 5
        } else {
            20_000 + day * 40 + (day % 7) * 1_500
        };
        csv.push_str(&format!("{},{}\n", date.format("%Y-%m-%d"), value));
    }
    csv
}

fn config_in(dir: &Path, csv: &str) -> Config {
    let input = dir.join("fcc-forum-pageviews.csv");
    fs::write(&input, csv).expect("fixture written");

    let mut config = Config::default();
    config.input_path = input;
    config.output.line_plot = dir.join("line_plot.png");
    config.output.bar_plot = dir.join("bar_plot.png");
    config.output.box_plot = dir.join("box_plot.png");
    config
}

fn read_png(path: &Path) -> Vec<u8> {
    let bytes = fs::read(path).unwrap_or_else(|e| panic!("{} not written: {}", path.display(), e));
    assert_eq!(&bytes[..8], &PNG_SIGNATURE, "{} is not a PNG", path.display());
    bytes
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn test_full_run_writes_three_figures_and_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), &fixture_csv(1_300));
    config.output.report_path = Some(dir.path().join("out/summary.json"));

    let summary = run(&config).expect("pipeline succeeds");

    assert_eq!(summary.rows_loaded, 1_300);
    assert_eq!(summary.rows_kept + summary.rows_removed, 1_300);
    assert!(summary.rows_removed > 0, "spikes should be trimmed");
    assert_eq!(summary.years, vec![2016, 2017, 2018, 2019]);
    assert_eq!(
        summary.outputs,
        vec![
            config.output.line_plot.clone(),
            config.output.bar_plot.clone(),
            config.output.box_plot.clone(),
        ]
    );
    for path in &summary.outputs {
        read_png(path);
    }

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("out/summary.json")).expect("report written"),
    )
    .expect("report is JSON");
    assert_eq!(report["rows_loaded"], 1_300);
    assert_eq!(report["years"][0], 2016);
}

#[test]
fn test_spikes_never_reach_the_figures() {
    let dataset = parse_dataset(fixture_csv(1_300).as_bytes(), b',').expect("fixture parses");
    let filtered = filter_outliers(&dataset, 0.025, 0.975);
    let bounds = filtered.bounds().expect("non-empty input has bounds");

    assert!(filtered.observations().iter().all(|o| o.value < 1_000_000.0));
    assert!(filtered.observations().iter().all(|o| o.value >= 5.0));
    assert!(filtered.observations().iter().all(|o| bounds.contains(o.value)));
    assert!(filtered
        .observations()
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(dir.path(), &fixture_csv(400));

    run(&config).expect("first run");
    let first: Vec<Vec<u8>> = [&config.output.line_plot, &config.output.bar_plot, &config.output.box_plot]
        .iter()
        .map(|p| read_png(p))
        .collect();

    run(&config).expect("second run");
    let second: Vec<Vec<u8>> = [&config.output.line_plot, &config.output.bar_plot, &config.output.box_plot]
        .iter()
        .map(|p| read_png(p))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_header_only_input_renders_empty_figures() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(dir.path(), "date,value\n");

    let summary = run(&config).expect("empty input still renders");

    assert_eq!(summary.rows_loaded, 0);
    assert_eq!(summary.rows_kept, 0);
    assert!(summary.bounds.is_none());
    assert!(summary.years.is_empty());
    for path in &summary.outputs {
        read_png(path);
    }
}

#[test]
fn test_output_directories_are_created() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), &fixture_csv(60));
    config.output.box_plot = dir.path().join("figures/nested/box.png");

    run(&config).expect("pipeline succeeds");
    read_png(&config.output.box_plot);
}

#[test]
fn test_unreadable_fonts_fall_back_to_bundled_text() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), &fixture_csv(120));
    config.figure.font_paths = vec![dir.path().join("missing.ttf")];

    run(&config).expect("run succeeds without a system font");

    let file = fs::File::open(&config.output.line_plot).expect("line plot written");
    let mut reader = png::Decoder::new(file).read_info().expect("PNG header");
    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels).expect("PNG frame");

    // The caption sits in the top 50 rows, above the axes.
    let caption_band = &pixels[..50 * frame.line_size];
    let dark = caption_band
        .chunks_exact(3)
        .filter(|px| px.iter().all(|c| *c < 128))
        .count();
    assert!(dark > 50, "title text missing from {}", config.output.line_plot.display());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), "date,value\n");
    config.input_path = dir.path().join("absent.csv");

    let err = run(&config).expect_err("missing input must fail");
    match err {
        PageViewError::Io { path, .. } => assert!(path.ends_with("absent.csv")),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert!(!config.output.line_plot.exists(), "no figure should be written");
}

#[test]
fn test_malformed_row_is_parse_error_with_position() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config_in(
        dir.path(),
        "date,value\n2019-01-01,10\n2019-01-02,lots\n2019-01-03,30\n",
    );

    let err = run(&config).expect_err("bad value must fail");
    match err {
        PageViewError::Parse { line, column, .. } => {
            assert_eq!(line, 3);
            assert_eq!(column, "value");
        }
        other => panic!("expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_invalid_quantiles_are_rejected_before_loading() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = config_in(dir.path(), "date,value\n");
    config.lower_quantile = 0.9;
    config.upper_quantile = 0.1;
    config.input_path = dir.path().join("absent.csv");

    assert!(matches!(run(&config), Err(PageViewError::Config(_))));
}
