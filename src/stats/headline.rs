//! Headline figures shown above the statistics tables.

use super::summary::{CategoricalSummary, Frequency, NumericSummary};
use crate::dataset::Dataset;
use crate::schema::{CategoricalColumn, NumericColumn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineFigures {
    pub total_devices: usize,
    pub avg_price: Option<f64>,
    pub median_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub total_brands: usize,
    pub total_models: usize,
    pub device_types: Vec<Frequency>,
    pub operating_systems: Vec<Frequency>,
}

impl HeadlineFigures {
    /// Absent columns contribute `None`, zero or an empty list.
    pub fn compute(dataset: &Dataset) -> Self {
        let price = dataset
            .numeric(NumericColumn::Price)
            .ok()
            .map(|values| NumericSummary::from_values(NumericColumn::Price, values));
        let categorical = |column: CategoricalColumn| {
            dataset
                .categorical(column)
                .ok()
                .map(|values| CategoricalSummary::from_values(column, values))
        };
        let brands = categorical(CategoricalColumn::Brand);
        let models = categorical(CategoricalColumn::Model);
        let device_types = categorical(CategoricalColumn::DeviceType);
        let systems = categorical(CategoricalColumn::Os);

        HeadlineFigures {
            total_devices: dataset.row_count(),
            avg_price: price.as_ref().and_then(|s| s.mean).map(round_cents),
            median_price: price.as_ref().and_then(|s| s.median).map(round_cents),
            min_price: price.as_ref().and_then(|s| s.min).map(round_cents),
            max_price: price.as_ref().and_then(|s| s.max).map(round_cents),
            total_brands: brands.as_ref().map_or(0, |s| s.unique),
            total_models: models.as_ref().map_or(0, |s| s.unique),
            device_types: device_types.map(|s| s.frequencies).unwrap_or_default(),
            operating_systems: systems.map(|s| s.frequencies).unwrap_or_default(),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
