//! Shared application state for the dashboard server

use crate::charts::ChartOptions;
use crate::dataset::Dataset;
use std::sync::Arc;

/// Shared application state
///
/// The dataset is loaded once and never mutated, so handlers read it without
/// locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub chart_options: ChartOptions,
}

impl AppState {
    /// Creates a new application state
    pub fn new(dataset: Dataset, chart_options: ChartOptions) -> Self {
        AppState {
            dataset: Arc::new(dataset),
            chart_options,
        }
    }
}
