//! Descriptive statistics for the statistics page.

pub mod headline;
pub mod primitives;
pub mod summary;

pub use headline::HeadlineFigures;
pub use primitives::FiveNumberSummary;
pub use summary::{
    value_counts, CategoricalSummary, DatasetMetadata, DatasetStatistics, Frequency,
    NumericSummary, StatisticsEngine,
};
