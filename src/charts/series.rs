//! Passive chart data handed to the presentation layer.

use crate::schema::NumericColumn;
use crate::stats::FiveNumberSummary;
use serde::Serialize;

/// The nine chart types on the charts page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Bar,
    Box,
    Histogram,
    Heatmap,
    Pie,
    Line,
    Violin,
    Sunburst,
}

/// Colors applied by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum ColorScheme {
    Single { color: &'static str },
    Palette { colors: Vec<&'static str> },
    Diverging { scale: &'static str, midpoint: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: &'static str,
    pub x_label: Option<&'static str>,
    pub y_label: Option<&'static str>,
    pub colors: ColorScheme,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub name: String,
    pub count: usize,
    pub summary: FiveNumberSummary,
}

/// Half-open bin `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub name: String,
    pub values: Vec<f64>,
}

/// Named price bucket used by the sunburst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PriceRange {
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    Premium,
    Luxury,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Budget,
        PriceRange::MidRange,
        PriceRange::Premium,
        PriceRange::Luxury,
    ];

    /// Lower bounds of Mid-range, Premium and Luxury.
    pub const THRESHOLDS: [f64; 3] = [1_000.0, 2_000.0, 3_500.0];

    pub fn from_price(price: f64) -> Self {
        let [mid, premium, luxury] = Self::THRESHOLDS;
        if price < mid {
            PriceRange::Budget
        } else if price < premium {
            PriceRange::MidRange
        } else if price < luxury {
            PriceRange::Premium
        } else {
            PriceRange::Luxury
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Budget => "Budget",
            PriceRange::MidRange => "Mid-range",
            PriceRange::Premium => "Premium",
            PriceRange::Luxury => "Luxury",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyLeaf {
    pub brand: String,
    pub os: String,
    pub price_range: PriceRange,
    pub count: usize,
}

/// Chart payload, one variant per data shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeriesData {
    Points {
        points: Vec<Point>,
        /// Pairs available before sampling.
        total: usize,
    },
    Categories {
        categories: Vec<CategoryValue>,
    },
    Boxes {
        groups: Vec<BoxGroup>,
    },
    Histogram {
        bins: Vec<HistogramBin>,
        underflow: usize,
        overflow: usize,
    },
    Matrix {
        labels: Vec<NumericColumn>,
        values: Vec<Vec<Option<f64>>>,
    },
    Slices {
        slices: Vec<PieSlice>,
    },
    Trend {
        points: Vec<TrendPoint>,
    },
    Distributions {
        groups: Vec<Distribution>,
    },
    Hierarchy {
        leaves: Vec<HierarchyLeaf>,
    },
}

impl SeriesData {
    pub fn is_empty(&self) -> bool {
        match self {
            SeriesData::Points { points, .. } => points.is_empty(),
            SeriesData::Categories { categories } => categories.is_empty(),
            SeriesData::Boxes { groups } => groups.is_empty(),
            SeriesData::Histogram {
                bins,
                underflow,
                overflow,
            } => bins.iter().all(|b| b.count == 0) && *underflow == 0 && *overflow == 0,
            SeriesData::Matrix { labels, .. } => labels.is_empty(),
            SeriesData::Slices { slices } => slices.is_empty(),
            SeriesData::Trend { points } => points.is_empty(),
            SeriesData::Distributions { groups } => groups.is_empty(),
            SeriesData::Hierarchy { leaves } => leaves.is_empty(),
        }
    }

    /// Empty payload of the shape `kind` renders.
    pub fn empty(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Scatter => SeriesData::Points {
                points: Vec::new(),
                total: 0,
            },
            ChartKind::Bar => SeriesData::Categories {
                categories: Vec::new(),
            },
            ChartKind::Box => SeriesData::Boxes { groups: Vec::new() },
            ChartKind::Histogram => SeriesData::Histogram {
                bins: Vec::new(),
                underflow: 0,
                overflow: 0,
            },
            ChartKind::Heatmap => SeriesData::Matrix {
                labels: Vec::new(),
                values: Vec::new(),
            },
            ChartKind::Pie => SeriesData::Slices { slices: Vec::new() },
            ChartKind::Line => SeriesData::Trend { points: Vec::new() },
            ChartKind::Violin => SeriesData::Distributions { groups: Vec::new() },
            ChartKind::Sunburst => SeriesData::Hierarchy { leaves: Vec::new() },
        }
    }
}

/// Data and layout for one chart on the charts page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Stable identifier, used as the element id on the page.
    pub id: &'static str,
    pub kind: ChartKind,
    pub layout: ChartLayout,
    pub data: SeriesData,
    /// Set when the chart was degraded to empty because a derivation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ChartSeries {
    pub fn new(id: &'static str, kind: ChartKind, layout: ChartLayout, data: SeriesData) -> Self {
        ChartSeries {
            id,
            kind,
            layout,
            data,
            notice: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_ranges_cover_thresholds() {
        assert_eq!(PriceRange::from_price(0.0), PriceRange::Budget);
        assert_eq!(PriceRange::from_price(999.99), PriceRange::Budget);
        assert_eq!(PriceRange::from_price(1_000.0), PriceRange::MidRange);
        assert_eq!(PriceRange::from_price(2_000.0), PriceRange::Premium);
        assert_eq!(PriceRange::from_price(3_500.0), PriceRange::Luxury);
        assert_eq!(PriceRange::Luxury.label(), "Luxury");
    }

    #[test]
    fn empty_payloads_match_their_kind() {
        for kind in [ChartKind::Scatter, ChartKind::Heatmap, ChartKind::Sunburst] {
            assert!(SeriesData::empty(kind).is_empty());
        }
    }

    #[test]
    fn series_data_is_tagged_by_shape() {
        let data = SeriesData::Slices {
            slices: vec![PieSlice {
                label: "Acme".to_string(),
                count: 1,
                percentage: 100.0,
            }],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "slices");
        assert_eq!(json["slices"][0]["label"], "Acme");
    }
}
