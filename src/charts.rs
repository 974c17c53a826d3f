//! Chart derivation for the charts page.

pub mod builder;
pub mod figure;
pub mod series;

pub use builder::{ChartOptions, ChartSpecBuilder, PriceBins};
pub use figure::to_figure;
pub use series::{
    BoxGroup, CategoryValue, ChartKind, ChartLayout, ChartSeries, ColorScheme, Distribution,
    HierarchyLeaf, HistogramBin, PieSlice, Point, PriceRange, SeriesData, TrendPoint,
};
