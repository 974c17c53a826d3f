//! Derives the nine chart series from the dataset.
//!
//! Each derivation is a pure function of the dataset and the options. A
//! grouping key that is null on every row yields an empty series; a column
//! missing from the schema yields `ColumnMissing`, which [`ChartSpecBuilder::build_all`]
//! turns into an empty series with a notice.

use super::series::{
    BoxGroup, CategoryValue, ChartKind, ChartLayout, ChartSeries, ColorScheme, Distribution,
    HierarchyLeaf, HistogramBin, PieSlice, Point, PriceRange, SeriesData, TrendPoint,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::{CategoricalColumn, NumericColumn};
use crate::stats::primitives::{mean, pearson};
use crate::stats::{value_counts, FiveNumberSummary};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const PRIMARY_COLOR: &str = "#667eea";
pub const SECONDARY_COLOR: &str = "#764ba2";
pub const PALETTE: [&str; 6] = [
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#4facfe", "#00f2fe",
];

/// Number of brands on the top-brands bar chart.
pub const TOP_BRANDS: usize = 10;

/// Fixed histogram binning over the declared price domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBins {
    pub start: f64,
    pub end: f64,
    pub bins: usize,
}

impl PriceBins {
    pub fn width(&self) -> f64 {
        (self.end - self.start) / self.bins as f64
    }
}

impl Default for PriceBins {
    fn default() -> Self {
        PriceBins {
            start: 0.0,
            end: 10_000.0,
            bins: 50,
        }
    }
}

/// Tunables for chart derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Scatter pairs above this count are down-sampled with a fixed stride.
    pub scatter_max_points: usize,
    pub price_bins: PriceBins,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            scatter_max_points: 2_000,
            price_bins: PriceBins::default(),
        }
    }
}

pub struct ChartSpecBuilder<'a> {
    dataset: &'a Dataset,
    options: ChartOptions,
}

impl<'a> ChartSpecBuilder<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_options(dataset, ChartOptions::default())
    }

    pub fn with_options(dataset: &'a Dataset, options: ChartOptions) -> Self {
        ChartSpecBuilder { dataset, options }
    }

    /// Builds all nine charts in page order.
    ///
    /// A chart whose derivation fails is replaced by an empty series carrying
    /// the error as a notice; the remaining charts are unaffected.
    pub fn build_all(&self) -> Vec<ChartSeries> {
        let derivations: [(&'static str, ChartKind, fn(&Self) -> Result<ChartSeries>); 9] = [
            (SCATTER_ID, ChartKind::Scatter, Self::price_performance_scatter),
            (BAR_ID, ChartKind::Bar, Self::top_brands_bar),
            (BOX_ID, ChartKind::Box, Self::price_by_os_box),
            (HISTOGRAM_ID, ChartKind::Histogram, Self::price_histogram),
            (HEATMAP_ID, ChartKind::Heatmap, Self::correlation_heatmap),
            (PIE_ID, ChartKind::Pie, Self::brand_pie),
            (LINE_ID, ChartKind::Line, Self::price_by_ram_line),
            (VIOLIN_ID, ChartKind::Violin, Self::price_by_storage_violin),
            (SUNBURST_ID, ChartKind::Sunburst, Self::brand_os_price_sunburst),
        ];

        derivations
            .into_iter()
            .map(|(id, kind, derive)| match derive(self) {
                Ok(series) => {
                    if series.is_empty() {
                        debug!("Chart '{}' has no data", id);
                    }
                    series
                }
                Err(err) => {
                    warn!("Chart '{}' degraded: {}", id, err);
                    ChartSeries {
                        notice: Some(err.to_string()),
                        ..ChartSeries::new(id, kind, layout_for(kind), SeriesData::empty(kind))
                    }
                }
            })
            .collect()
    }

    /// Price against performance score, stride-sampled above the point limit.
    pub fn price_performance_scatter(&self) -> Result<ChartSeries> {
        let scores = self.dataset.numeric(NumericColumn::PerformanceScore)?;
        let prices = self.dataset.numeric(NumericColumn::Price)?;

        let pairs: Vec<Point> = scores
            .iter()
            .zip(prices)
            .filter_map(|(score, price)| Some(Point { x: (*score)?, y: (*price)? }))
            .collect();
        let total = pairs.len();
        let points = stride_sample(pairs, self.options.scatter_max_points);

        Ok(self.series(SCATTER_ID, ChartKind::Scatter, SeriesData::Points { points, total }))
    }

    /// Top brands by mean price, descending, ties by brand name.
    pub fn top_brands_bar(&self) -> Result<ChartSeries> {
        let groups = self.price_groups(CategoricalColumn::Brand)?;

        let mut categories: Vec<CategoryValue> = groups
            .into_iter()
            .filter_map(|(brand, prices)| {
                Some(CategoryValue {
                    label: brand.to_string(),
                    value: mean(&prices)?,
                    count: prices.len(),
                })
            })
            .collect();
        categories.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
        categories.truncate(TOP_BRANDS);

        Ok(self.series(BAR_ID, ChartKind::Bar, SeriesData::Categories { categories }))
    }

    /// Five-number price summary per operating system, most common first.
    pub fn price_by_os_box(&self) -> Result<ChartSeries> {
        let groups = self.price_groups(CategoricalColumn::Os)?;

        let mut boxes: Vec<BoxGroup> = groups
            .into_iter()
            .filter_map(|(os, prices)| {
                let count = prices.len();
                Some(BoxGroup {
                    name: os.to_string(),
                    count,
                    summary: FiveNumberSummary::from_values(prices)?,
                })
            })
            .collect();
        boxes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Ok(self.series(BOX_ID, ChartKind::Box, SeriesData::Boxes { groups: boxes }))
    }

    /// Price counts over the fixed bins of the declared price domain.
    pub fn price_histogram(&self) -> Result<ChartSeries> {
        let prices = self.dataset.numeric(NumericColumn::Price)?;
        let PriceBins { start, end, bins } = self.options.price_bins;

        let present: Vec<f64> = prices.iter().flatten().copied().collect();
        if present.is_empty() || bins == 0 || end <= start {
            return Ok(self.series(
                HISTOGRAM_ID,
                ChartKind::Histogram,
                SeriesData::empty(ChartKind::Histogram),
            ));
        }

        let width = self.options.price_bins.width();
        let mut counts = vec![0usize; bins];
        let mut underflow = 0;
        let mut overflow = 0;
        for price in present {
            if price < start {
                underflow += 1;
            } else if price >= end {
                overflow += 1;
            } else {
                let index = (((price - start) / width) as usize).min(bins - 1);
                counts[index] += 1;
            }
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(index, count)| HistogramBin {
                lower: start + width * index as f64,
                upper: start + width * (index + 1) as f64,
                count,
            })
            .collect();

        Ok(self.series(
            HISTOGRAM_ID,
            ChartKind::Histogram,
            SeriesData::Histogram {
                bins,
                underflow,
                overflow,
            },
        ))
    }

    /// Pairwise Pearson correlation over every present numeric column.
    ///
    /// Uses pairwise-complete rows. The matrix is symmetric; the diagonal is
    /// exactly 1.0 for columns with nonzero variance and null otherwise.
    pub fn correlation_heatmap(&self) -> Result<ChartSeries> {
        let columns: Vec<(NumericColumn, &[Option<f64>])> = self
            .dataset
            .numeric_columns()
            .filter_map(|column| Some((column, self.dataset.numeric(column).ok()?)))
            .collect();
        let n = columns.len();

        let upper: Vec<Vec<Option<f64>>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| {
                        correlate(columns[i].1, columns[j].1).map(|r| if i == j { 1.0 } else { r })
                    })
                    .collect()
            })
            .collect();

        let mut values = vec![vec![None; n]; n];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + offset;
                values[i][j] = value;
                values[j][i] = value;
            }
        }

        let labels = columns.into_iter().map(|(column, _)| column).collect();
        Ok(self.series(HEATMAP_ID, ChartKind::Heatmap, SeriesData::Matrix { labels, values }))
    }

    /// Share of listings per brand, in percent.
    pub fn brand_pie(&self) -> Result<ChartSeries> {
        let brands = self.dataset.categorical(CategoricalColumn::Brand)?;
        let frequencies = value_counts(brands.iter().filter_map(|b| b.as_deref()));
        let total: usize = frequencies.iter().map(|f| f.count).sum();

        let slices = frequencies
            .into_iter()
            .map(|f| PieSlice {
                percentage: f.count as f64 * 100.0 / total as f64,
                label: f.value,
                count: f.count,
            })
            .collect();

        Ok(self.series(PIE_ID, ChartKind::Pie, SeriesData::Slices { slices }))
    }

    /// Mean price per RAM size, ascending by RAM size.
    pub fn price_by_ram_line(&self) -> Result<ChartSeries> {
        let ram = self.dataset.numeric(NumericColumn::RamGb)?;
        let prices = self.dataset.numeric(NumericColumn::Price)?;

        let mut buckets: BTreeMap<OrderedFloat<f64>, (f64, usize)> = BTreeMap::new();
        for (ram, price) in ram.iter().zip(prices) {
            if let (Some(ram), Some(price)) = (ram, price) {
                let bucket = buckets.entry(OrderedFloat(*ram)).or_insert((0.0, 0));
                bucket.0 += price;
                bucket.1 += 1;
            }
        }

        let points = buckets
            .into_iter()
            .map(|(ram, (sum, count))| TrendPoint {
                x: ram.into_inner(),
                mean: sum / count as f64,
                count,
            })
            .collect();

        Ok(self.series(LINE_ID, ChartKind::Line, SeriesData::Trend { points }))
    }

    /// Full price distribution per storage type, groups by name.
    pub fn price_by_storage_violin(&self) -> Result<ChartSeries> {
        let groups = self
            .price_groups(CategoricalColumn::StorageType)?
            .into_iter()
            .map(|(name, values)| Distribution {
                name: name.to_string(),
                values,
            })
            .collect();

        Ok(self.series(VIOLIN_ID, ChartKind::Violin, SeriesData::Distributions { groups }))
    }

    /// Listing counts per (brand, OS, price range).
    pub fn brand_os_price_sunburst(&self) -> Result<ChartSeries> {
        let brands = self.dataset.categorical(CategoricalColumn::Brand)?;
        let systems = self.dataset.categorical(CategoricalColumn::Os)?;
        let prices = self.dataset.numeric(NumericColumn::Price)?;

        let mut counts: BTreeMap<(&str, &str, PriceRange), usize> = BTreeMap::new();
        for ((brand, os), price) in brands.iter().zip(systems).zip(prices) {
            if let (Some(brand), Some(os), Some(price)) = (brand, os, price) {
                *counts
                    .entry((brand.as_str(), os.as_str(), PriceRange::from_price(*price)))
                    .or_insert(0) += 1;
            }
        }

        let leaves = counts
            .into_iter()
            .map(|((brand, os, price_range), count)| HierarchyLeaf {
                brand: brand.to_string(),
                os: os.to_string(),
                price_range,
                count,
            })
            .collect();

        Ok(self.series(SUNBURST_ID, ChartKind::Sunburst, SeriesData::Hierarchy { leaves }))
    }

    /// Prices grouped by a categorical key, keys in ascending order.
    fn price_groups(&self, key: CategoricalColumn) -> Result<BTreeMap<&'a str, Vec<f64>>> {
        let keys = self.dataset.categorical(key)?;
        let prices = self.dataset.numeric(NumericColumn::Price)?;

        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (key, price) in keys.iter().zip(prices) {
            if let (Some(key), Some(price)) = (key, price) {
                groups.entry(key.as_str()).or_default().push(*price);
            }
        }
        Ok(groups)
    }

    fn series(&self, id: &'static str, kind: ChartKind, data: SeriesData) -> ChartSeries {
        ChartSeries::new(id, kind, layout_for(kind), data)
    }
}

pub const SCATTER_ID: &str = "scatter_price_performance";
pub const BAR_ID: &str = "bar_top_brands";
pub const BOX_ID: &str = "box_price_os";
pub const HISTOGRAM_ID: &str = "hist_price";
pub const HEATMAP_ID: &str = "heatmap_correlation";
pub const PIE_ID: &str = "pie_brand";
pub const LINE_ID: &str = "line_price_ram";
pub const VIOLIN_ID: &str = "violin_price_storage";
pub const SUNBURST_ID: &str = "sunburst_brand_os_price";

fn layout_for(kind: ChartKind) -> ChartLayout {
    let single = ColorScheme::Single {
        color: PRIMARY_COLOR,
    };
    let palette = ColorScheme::Palette {
        colors: PALETTE.to_vec(),
    };

    match kind {
        ChartKind::Scatter => ChartLayout {
            title: "Price vs Performance Score",
            x_label: Some("Performance Score"),
            y_label: Some("Price ($)"),
            colors: single,
            height: 500,
        },
        ChartKind::Bar => ChartLayout {
            title: "Top 10 Brands with Highest Average Price",
            x_label: Some("Brand"),
            y_label: Some("Average Price ($)"),
            colors: single,
            height: 500,
        },
        ChartKind::Box => ChartLayout {
            title: "Price Distribution by Operating System",
            x_label: Some("Operating System"),
            y_label: Some("Price ($)"),
            colors: palette,
            height: 500,
        },
        ChartKind::Histogram => ChartLayout {
            title: "Price Distribution",
            x_label: Some("Price ($)"),
            y_label: Some("Frequency"),
            colors: single,
            height: 500,
        },
        ChartKind::Heatmap => ChartLayout {
            title: "Correlation Matrix of Numeric Variables",
            x_label: None,
            y_label: None,
            colors: ColorScheme::Diverging {
                scale: "RdBu",
                midpoint: 0.0,
            },
            height: 600,
        },
        ChartKind::Pie => ChartLayout {
            title: "Distribution of Brands",
            x_label: None,
            y_label: None,
            colors: palette,
            height: 500,
        },
        ChartKind::Line => ChartLayout {
            title: "Average Price Trend by RAM Size",
            x_label: Some("RAM (GB)"),
            y_label: Some("Average Price ($)"),
            colors: ColorScheme::Single {
                color: SECONDARY_COLOR,
            },
            height: 500,
        },
        ChartKind::Violin => ChartLayout {
            title: "Price Distribution by Storage Type",
            x_label: Some("Storage Type"),
            y_label: Some("Price ($)"),
            colors: palette,
            height: 500,
        },
        ChartKind::Sunburst => ChartLayout {
            title: "Brand, Operating System and Price Range",
            x_label: None,
            y_label: None,
            colors: palette,
            height: 600,
        },
    }
}

/// Keeps at most `max` items at evenly spaced indices `i * len / max`.
fn stride_sample<T>(items: Vec<T>, max: usize) -> Vec<T> {
    let len = items.len();
    if len <= max {
        return items;
    }
    if max == 0 {
        return Vec::new();
    }

    let mut keep = (0..max).map(|i| i * len / max).peekable();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if keep.peek() == Some(&index) {
                keep.next();
                Some(item)
            } else {
                None
            }
        })
        .collect()
}

fn correlate(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    pearson(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    #[test]
    fn stride_sample_is_uniform_and_deterministic() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(stride_sample(items.clone(), 5), vec![0, 2, 4, 6, 8]);
        assert_eq!(stride_sample(items.clone(), 20), items);
        assert_eq!(stride_sample(items.clone(), 3), vec![0, 3, 6]);
        assert!(stride_sample(items, 0).is_empty());
    }

    #[test]
    fn correlate_uses_pairwise_complete_rows() {
        let xs = [Some(1.0), Some(2.0), None, Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(100.0), Some(6.0)];
        assert!((correlate(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_bins_tile_the_domain() {
        let bins = PriceBins::default();
        assert_eq!(bins.width(), 200.0);
    }

    #[test]
    fn top_brands_sorted_by_mean_price() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset).top_brands_bar().unwrap();
        let SeriesData::Categories { categories } = series.data else {
            panic!("bar chart should carry categories");
        };

        let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Orbit", "Acme"]);
        assert_eq!(categories[2].value, 1150.0);
    }

    #[test]
    fn box_groups_ordered_by_size_then_name() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset).price_by_os_box().unwrap();
        let SeriesData::Boxes { groups } = series.data else {
            panic!("box chart should carry groups");
        };

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Windows", "Linux", "macOS"]);
        assert_eq!(groups[0].summary.median, 1200.0);
    }

    #[test]
    fn line_buckets_ascend_by_ram() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset).price_by_ram_line().unwrap();
        let SeriesData::Trend { points } = series.data else {
            panic!("line chart should carry trend points");
        };

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![8.0, 16.0, 32.0, 64.0]);
        assert_eq!(points[1].mean, 1350.0);
        assert_eq!(points[1].count, 2);
    }

    #[test]
    fn violin_keeps_full_distributions() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset)
            .price_by_storage_violin()
            .unwrap();
        let SeriesData::Distributions { groups } = series.data else {
            panic!("violin chart should carry distributions");
        };

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2].name, "SSD");
        assert_eq!(groups[2].values, vec![800.0, 2500.0, 1200.0]);
    }

    #[test]
    fn sunburst_counts_complete_rows() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset)
            .brand_os_price_sunburst()
            .unwrap();
        let SeriesData::Hierarchy { leaves } = series.data else {
            panic!("sunburst should carry leaves");
        };

        assert_eq!(leaves.iter().map(|l| l.count).sum::<usize>(), 5);
        assert!(leaves.iter().any(|l| l.brand == "Zeta"
            && l.os == "macOS"
            && l.price_range == PriceRange::Luxury));
    }

    #[test]
    fn histogram_counts_out_of_domain_prices() {
        let dataset = Dataset::builder()
            .numeric(
                NumericColumn::Price,
                vec![Some(-5.0), Some(0.0), Some(199.0), Some(200.0), Some(10_000.0), None],
            )
            .build()
            .unwrap();
        let series = ChartSpecBuilder::new(&dataset).price_histogram().unwrap();
        let SeriesData::Histogram {
            bins,
            underflow,
            overflow,
        } = series.data
        else {
            panic!("histogram should carry bins");
        };

        assert_eq!(bins.len(), 50);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 1);
        assert_eq!(underflow, 1);
        assert_eq!(overflow, 1);
    }

    #[test]
    fn constant_column_has_null_correlations() {
        let dataset = sample_dataset();
        let series = ChartSpecBuilder::new(&dataset).correlation_heatmap().unwrap();
        let SeriesData::Matrix { labels, values } = series.data else {
            panic!("heatmap should carry a matrix");
        };

        let bluetooth = labels
            .iter()
            .position(|c| *c == NumericColumn::Bluetooth)
            .unwrap();
        assert!(values[bluetooth].iter().all(Option::is_none));
        let price = labels.iter().position(|c| *c == NumericColumn::Price).unwrap();
        assert_eq!(values[price][price], Some(1.0));
    }

    #[test]
    fn repeated_decimal_column_has_null_correlations() {
        let dataset = Dataset::builder()
            .numeric(NumericColumn::Price, vec![Some(900.0), Some(1_400.0), Some(2_100.0)])
            .numeric(NumericColumn::DisplaySizeIn, vec![Some(15.6); 3])
            .build()
            .unwrap();
        let series = ChartSpecBuilder::new(&dataset).correlation_heatmap().unwrap();
        let SeriesData::Matrix { labels, values } = series.data else {
            panic!("heatmap should carry a matrix");
        };

        let display = labels
            .iter()
            .position(|c| *c == NumericColumn::DisplaySizeIn)
            .unwrap();
        assert!(values[display].iter().all(Option::is_none));
    }

    #[test]
    fn missing_column_degrades_single_chart() {
        let dataset = Dataset::builder()
            .numeric(NumericColumn::Price, vec![Some(100.0), Some(200.0)])
            .categorical(CategoricalColumn::Brand, vec![Some("Acme"), Some("Zeta")])
            .build()
            .unwrap();
        let charts = ChartSpecBuilder::new(&dataset).build_all();

        assert_eq!(charts.len(), 9);
        let box_chart = charts.iter().find(|c| c.id == BOX_ID).unwrap();
        assert!(box_chart.is_empty());
        assert!(box_chart.notice.as_deref().unwrap().contains("os"));

        let bar = charts.iter().find(|c| c.id == BAR_ID).unwrap();
        assert!(!bar.is_empty());
        assert!(bar.notice.is_none());
    }

    #[test]
    fn all_null_grouping_key_gives_empty_series() {
        let dataset = Dataset::builder()
            .numeric(NumericColumn::Price, vec![Some(100.0), Some(200.0)])
            .categorical::<String>(CategoricalColumn::Brand, vec![None, None])
            .build()
            .unwrap();
        let series = ChartSpecBuilder::new(&dataset).brand_pie().unwrap();

        assert!(series.is_empty());
        assert!(series.notice.is_none());
    }
}
