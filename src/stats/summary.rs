//! Descriptive statistics over the whole dataset.

use super::primitives::{mean, numeric_mode, quantile_sorted, sample_std_dev, sort_values};
use crate::dataset::Dataset;
use crate::schema::{CategoricalColumn, Column, NumericColumn};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Descriptive statistics of one numeric column.
///
/// Missing values are excluded and counted in `missing`. Every statistic is
/// `None` when no value is present; `std_dev` also needs at least two values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
}

impl NumericSummary {
    pub fn from_values(column: NumericColumn, values: &[Option<f64>]) -> Self {
        let mut present: Vec<f64> = values.iter().flatten().copied().collect();
        sort_values(&mut present);

        let min = present.first().copied();
        let max = present.last().copied();

        NumericSummary {
            column,
            count: present.len(),
            missing: values.len() - present.len(),
            mean: mean(&present),
            median: quantile_sorted(&present, 0.5),
            mode: numeric_mode(&present),
            std_dev: sample_std_dev(&present),
            min,
            q1: quantile_sorted(&present, 0.25),
            q3: quantile_sorted(&present, 0.75),
            max,
            range: min.zip(max).map(|(min, max)| max - min),
        }
    }
}

/// Occurrences of one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

/// Frequency table of one categorical column.
///
/// Missing values are excluded from `frequencies` and counted in `missing`.
/// Frequencies are ordered by count descending, ties by first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub column: CategoricalColumn,
    pub count: usize,
    pub missing: usize,
    pub unique: usize,
    pub mode: Option<String>,
    pub frequencies: Vec<Frequency>,
}

impl CategoricalSummary {
    pub fn from_values(column: CategoricalColumn, values: &[Option<String>]) -> Self {
        let frequencies = value_counts(values.iter().filter_map(|v| v.as_deref()));
        let count = frequencies.iter().map(|f| f.count).sum();

        CategoricalSummary {
            column,
            count,
            missing: values.len() - count,
            unique: frequencies.len(),
            mode: frequencies.first().map(|f| f.value.clone()),
            frequencies,
        }
    }
}

/// Counts values, ordering by count descending then by first appearance.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Frequency> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    let mut ordered: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_seen))| (value, count, first_seen))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ordered
        .into_iter()
        .map(|(value, count, _)| Frequency {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Global dataset facts shown at the top of the statistics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMetadata {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_column_count: usize,
    pub categorical_column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Full output of [`StatisticsEngine::compute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatistics {
    pub metadata: DatasetMetadata,
    pub numeric: BTreeMap<NumericColumn, NumericSummary>,
    pub categorical: BTreeMap<CategoricalColumn, CategoricalSummary>,
    /// Schema columns absent from the source file.
    pub unavailable_columns: Vec<Column>,
}

/// Computes descriptive statistics for every present schema column.
pub struct StatisticsEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> StatisticsEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        StatisticsEngine { dataset }
    }

    pub fn compute(&self) -> DatasetStatistics {
        let numeric: BTreeMap<_, _> = self
            .dataset
            .numeric_columns()
            .filter_map(|column| {
                let values = self.dataset.numeric(column).ok()?;
                Some((column, NumericSummary::from_values(column, values)))
            })
            .collect();

        let categorical: BTreeMap<_, _> = self
            .dataset
            .categorical_columns()
            .filter_map(|column| {
                let values = self.dataset.categorical(column).ok()?;
                Some((column, CategoricalSummary::from_values(column, values)))
            })
            .collect();

        let unavailable_columns: Vec<Column> = self.dataset.missing_columns().collect();
        if !unavailable_columns.is_empty() {
            debug!(
                "{} schema columns unavailable: {:?}",
                unavailable_columns.len(),
                unavailable_columns.iter().map(|c| c.name()).collect::<Vec<_>>()
            );
        }

        DatasetStatistics {
            metadata: DatasetMetadata {
                row_count: self.dataset.row_count(),
                column_count: numeric.len() + categorical.len(),
                numeric_column_count: numeric.len(),
                categorical_column_count: categorical.len(),
                loaded_at: self.dataset.loaded_at(),
            },
            numeric,
            categorical,
            unavailable_columns,
        }
    }
}
