/// Five-number summaries for box-and-whisker plots.

use super::outliers::quantile_sorted;

/// How far past the box, in multiples of the IQR, whiskers may reach.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Box plot geometry for one group of values.
///
/// Quartiles use the same linear interpolation as the outlier filter.
/// Whiskers end at the most extreme data points still within
/// `WHISKER_IQR_FACTOR * IQR` of the box; anything beyond is a flier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    /// Returns `None` for an empty group or one containing NaN.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        // Sorted, so the first/last in-fence values are the whisker ends.
        // The quartiles always lie inside the fences, so both exist.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            fliers,
            count: sorted.len(),
        })
    }

    /// Smallest and largest value drawn for this box, fliers included.
    pub fn extent(&self) -> (f64, f64) {
        let low = self.fliers.first().map_or(self.whisker_low, |f| f.min(self.whisker_low));
        let high = self.fliers.last().map_or(self.whisker_high, |f| f.max(self.whisker_high));
        (low, high)
    }
}
