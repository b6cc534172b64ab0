/// Calendar groupings of the cleaned series.
///
/// Organizes a flat `FilteredDataset` into the shapes the renderers draw:
/// a year × month table of means for the bar chart, and per-year and
/// per-month value groups for the box plots. Month order always comes from
/// the constants in `model`, never from the data.

use std::collections::BTreeMap;

use crate::model::{FilteredDataset, MONTH_ABBREVIATIONS, MONTH_NAMES};

// ---------------------------------------------------------------------------
// Monthly averages
// ---------------------------------------------------------------------------

/// Mean value per (year, month), one row per year in ascending order and one
/// column per calendar month January…December.
///
/// A (year, month) pair with no observations is `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyAverages {
    rows: Vec<(i32, [Option<f64>; 12])>,
}

impl MonthlyAverages {
    /// Column headers, in display order.
    pub fn columns(&self) -> &'static [&'static str; 12] {
        &MONTH_NAMES
    }

    /// Every year with its twelve month slots, ascending by year.
    pub fn rows(&self) -> &[(i32, [Option<f64>; 12])] {
        &self.rows
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|(year, _)| *year).collect()
    }

    /// All twelve month slots for `year`, or `None` if the year is absent.
    pub fn row(&self, year: i32) -> Option<&[Option<f64>; 12]> {
        self.rows
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, months)| months)
    }

    /// Mean for `year` and the full month name `month`.
    pub fn get(&self, year: i32, month: &str) -> Option<f64> {
        let idx = MONTH_NAMES.iter().position(|m| *m == month)?;
        self.row(year).and_then(|months| months[idx])
    }

    /// Present entries in row-major display order.
    pub fn entries(&self) -> impl Iterator<Item = (i32, &'static str, f64)> + '_ {
        self.rows.iter().flat_map(|(year, months)| {
            months
                .iter()
                .enumerate()
                .filter_map(move |(idx, mean)| mean.map(|m| (*year, MONTH_NAMES[idx], m)))
        })
    }

    /// Number of (year, month) pairs with data.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.entries().map(|(_, _, mean)| mean).reduce(f64::max)
    }
}

/// Group by (year, month) and take the arithmetic mean of each group.
pub fn monthly_averages(data: &FilteredDataset) -> MonthlyAverages {
    let mut sums: BTreeMap<i32, [(f64, usize); 12]> = BTreeMap::new();
    for obs in data.observations() {
        let slot = &mut sums.entry(obs.year()).or_insert([(0.0, 0); 12])[obs.month_index()];
        slot.0 += obs.value;
        slot.1 += 1;
    }

    let rows = sums
        .into_iter()
        .map(|(year, months)| {
            let means = months.map(|(sum, count)| (count > 0).then(|| sum / count as f64));
            (year, means)
        })
        .collect();

    MonthlyAverages { rows }
}

// ---------------------------------------------------------------------------
// Distribution groups
// ---------------------------------------------------------------------------

/// Values sharing one categorical label, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// One group per distinct year, ascending.
pub fn yearly_groups(data: &FilteredDataset) -> Vec<CategoryGroup> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for obs in data.observations() {
        by_year.entry(obs.year()).or_default().push(obs.value);
    }
    by_year
        .into_iter()
        .map(|(year, values)| CategoryGroup {
            label: year.to_string(),
            values,
        })
        .collect()
}

/// Exactly twelve groups, Jan…Dec, pooling every year. Months without
/// observations are present with no values.
pub fn monthly_groups(data: &FilteredDataset) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = MONTH_ABBREVIATIONS
        .iter()
        .map(|abbr| CategoryGroup {
            label: abbr.to_string(),
            values: Vec::new(),
        })
        .collect();
    for obs in data.observations() {
        groups[obs.month_index()].values.push(obs.value);
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
