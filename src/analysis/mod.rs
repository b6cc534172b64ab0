/// Cleaning and aggregation of the loaded series.
///
/// Everything here is pure: datasets in, derived values out. Rendering
/// consumes the results but never computes statistics itself.
///
/// Submodules:
/// - `outliers`: quantiles and single-pass percentile trimming.
/// - `groupings`: per (year, month) means and per-category value groups.
/// - `box_stats`: quartiles, whiskers and fliers for box plots.

pub mod box_stats;
pub mod groupings;
pub mod outliers;

pub use box_stats::BoxStats;
pub use groupings::{monthly_averages, monthly_groups, yearly_groups, CategoryGroup, MonthlyAverages};
pub use outliers::{filter_outliers, quantile};
