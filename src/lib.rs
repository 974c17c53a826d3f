pub mod charts;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod schema;
pub mod server;
pub mod stats;

#[cfg(test)]
mod testing;

pub use charts::{ChartKind, ChartOptions, ChartSeries, ChartSpecBuilder, SeriesData};
pub use dataset::{Dataset, DatasetBuilder};
pub use error::DashboardError;
pub use loader::{load_dataset, load_from_reader};
pub use schema::{CategoricalColumn, Column, NumericColumn};
pub use server::{run_server, ApiError, AppState, ServerConfig};
pub use stats::{
    CategoricalSummary, DatasetStatistics, HeadlineFigures, NumericSummary, StatisticsEngine,
};
