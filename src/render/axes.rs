/// Axis ranges, tick positions and text styles shared by the renderers.
///
/// Frames, grids, tick labels, captions and legends are drawn by plotters
/// itself; this module only decides where the ticks go and what the
/// categorical ones say.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use std::ops::Range;

use super::fonts::FONT_FAMILY;
use super::palette::AXIS_COLOR;

pub const TITLE_SIZE: u32 = 22;
pub const LABEL_SIZE: u32 = 17;
pub const TICK_SIZE: u32 = 13;

/// Largest magnitude an axis end can take. Values beyond it are pinned to
/// the edge so the axis span stays finite.
pub const RANGE_LIMIT: f64 = f64::MAX / 4.0;

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Range covering `values` with 5% headroom on both sides. Degenerate input
/// (empty, or all values equal) still yields a non-empty range, and the
/// span is always finite.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(-RANGE_LIMIT, RANGE_LIMIT))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min > max {
        return 0.0..1.0;
    }
    let pad = if min == max {
        if min == 0.0 { 1.0 } else { min.abs() * 0.05 }
    } else {
        // Halved first so max - min cannot overflow.
        (max / 2.0 - min / 2.0) * 0.1
    };
    (min - pad)..(max + pad)
}

/// Range from zero up to 5% above `max`, for bars that grow from the axis.
pub fn zero_based_range(max: Option<f64>) -> Range<f64> {
    match max {
        Some(m) if m.is_finite() && m > 0.0 => 0.0..m.min(RANGE_LIMIT) * 1.05,
        _ => 0.0..1.0,
    }
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// First-of-month dates between `start` and `end` (inclusive), spaced by a
/// whole number of months so that at most `max_ticks` are returned.
pub fn month_ticks(start: NaiveDate, end: NaiveDate, max_ticks: usize) -> Vec<NaiveDate> {
    if end < start || max_ticks == 0 {
        return Vec::new();
    }
    let month_number = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
    let first = month_number(start) + i32::from(start.day() != 1);
    let last = month_number(end);
    let span = (last - first).max(0) as usize + 1;

    let step = [1usize, 2, 3, 4, 6, 12, 24, 60, 120]
        .into_iter()
        .find(|s| span.div_ceil(*s) <= max_ticks)
        .unwrap_or(span);

    (first..=last)
        .filter(|m| m.rem_euclid(step as i32) == 0)
        .filter_map(|m| NaiveDate::from_ymd_opt(m.div_euclid(12), m.rem_euclid(12) as u32 + 1, 1))
        .take(max_ticks)
        .collect()
}

/// Centre of every category slot on an integer axis where each category
/// owns `slot_width` units.
pub fn category_ticks(count: usize, slot_width: i32) -> Vec<i32> {
    (0..count as i32).map(|i| i * slot_width + slot_width / 2).collect()
}

/// Label for the category whose slot contains `x`; empty between or past
/// the categories.
pub fn category_label(labels: &[String], slot_width: i32, x: i32) -> String {
    if x < 0 || slot_width <= 0 {
        return String::new();
    }
    labels
        .get((x / slot_width) as usize)
        .cloned()
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

pub fn title_style() -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, TITLE_SIZE).into_font()).color(&AXIS_COLOR)
}

pub fn label_style() -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, LABEL_SIZE).into_font()).color(&AXIS_COLOR)
}

pub fn tick_style() -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, TICK_SIZE).into_font()).color(&AXIS_COLOR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_range([0.0]), -1.0..1.0);
        let single = padded_range([100.0]);
        assert!(single.start < 100.0 && single.end > 100.0);
    }

    #[test]
    fn test_padded_range_adds_five_percent() {
        assert_eq!(padded_range([0.0, 100.0, 50.0]), -5.0..105.0);
    }

    #[test]
    fn test_padded_range_stays_finite_for_huge_values() {
        let range = padded_range([0.05e308, 1.745e308]);
        assert!(range.start.is_finite() && range.end.is_finite());
        assert!((range.end - range.start).is_finite());
        assert!(range.start <= 0.05e308);
        assert!(range.start < range.end);

        let pinned = padded_range([f64::MAX, f64::MAX]);
        assert!((pinned.end - pinned.start).is_finite());
        assert!(pinned.start < pinned.end);

        let both_ways = padded_range([-f64::MAX, f64::MAX]);
        assert!((both_ways.end - both_ways.start).is_finite());
    }

    #[test]
    fn test_zero_based_range() {
        let bars = zero_based_range(Some(100.0));
        assert_eq!(bars.start, 0.0);
        assert!((bars.end - 105.0).abs() < 1e-9);
        assert_eq!(zero_based_range(None), 0.0..1.0);
        assert_eq!(zero_based_range(Some(-3.0)), 0.0..1.0);
        assert!(zero_based_range(Some(f64::MAX)).end.is_finite());
    }

    #[test]
    fn test_month_ticks_are_first_of_month_and_bounded() {
        let ticks = month_ticks(date(2016, 5, 9), date(2019, 12, 3), 8);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= 8);
        assert!(ticks.iter().all(|d| d.day() == 1));
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert!(ticks[0] > date(2016, 5, 9));
        assert!(*ticks.last().expect("non-empty") <= date(2019, 12, 3));
    }

    #[test]
    fn test_month_ticks_short_span_is_monthly() {
        let ticks = month_ticks(date(2020, 1, 1), date(2020, 4, 15), 8);
        assert_eq!(
            ticks,
            vec![date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1), date(2020, 4, 1)]
        );
    }

    #[test]
    fn test_month_ticks_inverted_range_is_empty() {
        assert!(month_ticks(date(2020, 5, 1), date(2020, 1, 1), 8).is_empty());
    }

    #[test]
    fn test_category_ticks_sit_mid_slot() {
        assert_eq!(category_ticks(3, 14), vec![7, 21, 35]);
        assert!(category_ticks(0, 14).is_empty());
    }

    #[test]
    fn test_category_label_maps_slots() {
        let labels = vec!["2019".to_string(), "2020".to_string()];
        assert_eq!(category_label(&labels, 14, 7), "2019");
        assert_eq!(category_label(&labels, 14, 21), "2020");
        assert_eq!(category_label(&labels, 14, 28), "");
        assert_eq!(category_label(&labels, 14, -1), "");
    }
}
