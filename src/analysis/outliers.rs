/// Percentile-based outlier removal.
///
/// Bounds are computed once over the unfiltered values and applied in a
/// single pass. Re-running the filter on its own output would tighten the
/// bounds again; the pipeline never does that.

use crate::logging::{self, Stage};
use crate::model::{Dataset, FilteredDataset, PercentileBounds};

/// Lower quantile of the default trimming window.
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.025;
/// Upper quantile of the default trimming window.
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.975;

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// The `q`-th quantile of `values` by linear interpolation between the two
/// nearest ranks (rank `h = (n - 1) * q`).
///
/// Returns `None` if `values` is empty, contains NaN, or `q` is outside
/// `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// Same as [`quantile`] for data already sorted ascending.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * q;
    let lower = h.floor() as usize;
    let frac = h - h.floor();

    if lower + 1 >= n {
        Some(sorted[n - 1])
    } else {
        Some(sorted[lower] + frac * (sorted[lower + 1] - sorted[lower]))
    }
}

/// Inclusive bounds at `lower_q` and `upper_q`, or `None` for empty input.
pub fn percentile_bounds(values: &[f64], lower_q: f64, upper_q: f64) -> Option<PercentileBounds> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(PercentileBounds {
        lower: quantile_sorted(&sorted, lower_q)?,
        upper: quantile_sorted(&sorted, upper_q)?,
    })
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep the observations whose value lies within `[P(lower_q), P(upper_q)]`
/// of the full dataset, both ends inclusive, preserving order.
///
/// When no bounds exist (empty input, or quantiles outside [0, 1]) nothing
/// is kept and every input row counts as removed.
pub fn filter_outliers(dataset: &Dataset, lower_q: f64, upper_q: f64) -> FilteredDataset {
    let Some(bounds) = percentile_bounds(&dataset.values(), lower_q, upper_q) else {
        if !dataset.is_empty() {
            log::warn!(
                target: Stage::Filter.target(),
                "No percentile bounds for quantiles {} and {}; dropping all {} rows",
                lower_q,
                upper_q,
                dataset.len()
            );
        }
        logging::log_filter_summary(dataset.len(), 0);
        return FilteredDataset::new(Vec::new(), None, dataset.len());
    };

    log::debug!(
        target: Stage::Filter.target(),
        "Percentile bounds: [{:.2}, {:.2}]",
        bounds.lower,
        bounds.upper
    );

    let kept: Vec<_> = dataset
        .observations()
        .iter()
        .filter(|obs| bounds.contains(obs.value))
        .copied()
        .collect();
    let removed = dataset.len() - kept.len();

    logging::log_filter_summary(dataset.len(), kept.len());
    FilteredDataset::new(kept, Some(bounds), removed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
