//! Plotly figure JSON for the charts page.
//!
//! The browser passes `data` and `layout` straight to `Plotly.newPlot`.

use super::series::{ChartKind, ChartSeries, ColorScheme, SeriesData};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const TITLE_COLOR: &str = "#2c3e50";
const FONT_FAMILY: &str = "Arial, sans-serif";
const PLOT_BACKGROUND: &str = "rgba(248, 249, 250, 0.5)";

/// Renders a series as a Plotly figure, or a "No data available"
/// placeholder when it is empty.
pub fn to_figure(series: &ChartSeries) -> Value {
    if series.is_empty() {
        return no_data_figure(series);
    }

    let mut layout = base_layout(series);
    let data = match &series.data {
        SeriesData::Points { points, .. } => json!([{
            "type": "scatter",
            "mode": "markers",
            "x": points.iter().map(|p| p.x).collect::<Vec<_>>(),
            "y": points.iter().map(|p| p.y).collect::<Vec<_>>(),
            "marker": { "color": primary_color(&series.layout.colors), "size": 6, "opacity": 0.6 },
            "name": series.layout.title,
        }]),
        SeriesData::Categories { categories } => {
            layout["xaxis"]["tickangle"] = json!(-35);
            json!([{
                "type": "bar",
                "x": categories.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
                "y": categories.iter().map(|c| c.value).collect::<Vec<_>>(),
                "marker": { "color": primary_color(&series.layout.colors) },
                "text": categories.iter().map(|c| format!("${:.0}", c.value)).collect::<Vec<_>>(),
                "textposition": "outside",
            }])
        }
        SeriesData::Boxes { groups } => Value::Array(
            groups
                .iter()
                .map(|group| {
                    let s = group.summary;
                    json!({
                        "type": "box",
                        "name": group.name,
                        "x": [group.name],
                        "lowerfence": [s.min],
                        "q1": [s.q1],
                        "median": [s.median],
                        "q3": [s.q3],
                        "upperfence": [s.max],
                    })
                })
                .collect(),
        ),
        SeriesData::Histogram { bins, .. } => {
            layout["bargap"] = json!(0.02);
            json!([{
                "type": "bar",
                "x": bins.iter().map(|b| (b.lower + b.upper) / 2.0).collect::<Vec<_>>(),
                "y": bins.iter().map(|b| b.count).collect::<Vec<_>>(),
                "width": bins.iter().map(|b| b.upper - b.lower).collect::<Vec<_>>(),
                "marker": { "color": primary_color(&series.layout.colors) },
                "name": "Price Distribution",
            }])
        }
        SeriesData::Matrix { labels, values } => {
            let (scale, midpoint) = match series.layout.colors {
                ColorScheme::Diverging { scale, midpoint } => (scale, midpoint),
                _ => ("RdBu", 0.0),
            };
            json!([{
                "type": "heatmap",
                "z": values,
                "x": labels,
                "y": labels,
                "colorscale": scale,
                "zmid": midpoint,
                "text": values,
                "texttemplate": "%{text:.2f}",
                "textfont": { "size": 10 },
                "hoverongaps": false,
            }])
        }
        SeriesData::Slices { slices } => json!([{
            "type": "pie",
            "labels": slices.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            "values": slices.iter().map(|s| s.count).collect::<Vec<_>>(),
            "hole": 0.35,
            "marker": { "colors": palette(&series.layout.colors) },
            "textinfo": "label+percent",
            "hovertemplate": "%{label}<br>Count: %{value}<br>% of total: %{percent}<extra></extra>",
        }]),
        SeriesData::Trend { points } => json!([{
            "type": "scatter",
            "mode": "lines+markers",
            "x": points.iter().map(|p| p.x).collect::<Vec<_>>(),
            "y": points.iter().map(|p| p.mean).collect::<Vec<_>>(),
            "line": { "color": primary_color(&series.layout.colors), "width": 3 },
            "marker": { "color": primary_color(&series.layout.colors), "size": 8 },
            "name": "Average Price",
        }]),
        SeriesData::Distributions { groups } => {
            let colors = palette(&series.layout.colors);
            Value::Array(
                groups
                    .iter()
                    .enumerate()
                    .map(|(index, group)| {
                        json!({
                            "type": "violin",
                            "name": group.name,
                            "y": group.values,
                            "box": { "visible": true },
                            "meanline": { "visible": true },
                            "line": { "color": colors[index % colors.len()] },
                        })
                    })
                    .collect(),
            )
        }
        SeriesData::Hierarchy { leaves } => {
            layout["sunburstcolorway"] = json!(palette(&series.layout.colors));
            let mut nodes: BTreeMap<String, (String, String, usize)> = BTreeMap::new();
            for leaf in leaves {
                let brand_id = leaf.brand.clone();
                let os_id = format!("{}/{}", leaf.brand, leaf.os);
                let range_id = format!("{}/{}", os_id, leaf.price_range.label());

                for (id, label, parent) in [
                    (brand_id.clone(), leaf.brand.clone(), String::new()),
                    (os_id.clone(), leaf.os.clone(), brand_id),
                    (range_id, leaf.price_range.label().to_string(), os_id),
                ] {
                    nodes.entry(id).or_insert((label, parent, 0)).2 += leaf.count;
                }
            }

            json!([{
                "type": "sunburst",
                "ids": nodes.keys().collect::<Vec<_>>(),
                "labels": nodes.values().map(|n| n.0.as_str()).collect::<Vec<_>>(),
                "parents": nodes.values().map(|n| n.1.as_str()).collect::<Vec<_>>(),
                "values": nodes.values().map(|n| n.2).collect::<Vec<_>>(),
                "branchvalues": "total",
            }])
        }
    };

    json!({ "data": data, "layout": layout })
}

fn base_layout(series: &ChartSeries) -> Value {
    let layout = &series.layout;
    let mut value = json!({
        "title": {
            "text": layout.title,
            "x": 0.5,
            "xanchor": "center",
            "font": { "size": 18, "color": TITLE_COLOR, "family": FONT_FAMILY },
        },
        "template": "plotly_white",
        "autosize": true,
        "height": layout.height,
        "margin": { "l": 90, "r": 60, "t": 120, "b": 90 },
        "font": { "size": 12, "family": FONT_FAMILY },
        "paper_bgcolor": "white",
        "plot_bgcolor": PLOT_BACKGROUND,
        "showlegend": matches!(series.kind, ChartKind::Box | ChartKind::Violin),
    });
    if let Some(x_label) = layout.x_label {
        value["xaxis"] = json!({ "title": { "text": x_label } });
    }
    if let Some(y_label) = layout.y_label {
        value["yaxis"] = json!({ "title": { "text": y_label } });
    }
    value
}

fn no_data_figure(series: &ChartSeries) -> Value {
    let mut layout = base_layout(series);
    let text = match &series.notice {
        Some(notice) => format!("No data available<br><sub>{}</sub>", notice),
        None => "No data available".to_string(),
    };
    layout["annotations"] = json!([{
        "text": text,
        "xref": "paper",
        "yref": "paper",
        "x": 0.5,
        "y": 0.5,
        "xanchor": "center",
        "yanchor": "middle",
        "showarrow": false,
        "font": { "size": 20, "color": "gray" },
    }]);
    json!({ "data": [], "layout": layout })
}

fn primary_color(scheme: &ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Single { color } => *color,
        ColorScheme::Palette { colors } => colors.first().copied().unwrap_or("#667eea"),
        ColorScheme::Diverging { .. } => "#667eea",
    }
}

fn palette(scheme: &ColorScheme) -> Vec<&'static str> {
    match scheme {
        ColorScheme::Palette { colors } if !colors.is_empty() => colors.clone(),
        other => vec![primary_color(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::series::{ChartLayout, HierarchyLeaf, PieSlice, PriceRange};

    fn layout() -> ChartLayout {
        ChartLayout {
            title: "Test",
            x_label: Some("x"),
            y_label: None,
            colors: ColorScheme::Single { color: "#000000" },
            height: 400,
        }
    }

    #[test]
    fn empty_series_render_placeholder() {
        let series = ChartSeries::new("pie", ChartKind::Pie, layout(), SeriesData::empty(ChartKind::Pie));
        let figure = to_figure(&series);

        assert_eq!(figure["data"], json!([]));
        assert_eq!(figure["layout"]["annotations"][0]["text"], "No data available");
        assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "x");
    }

    #[test]
    fn pie_uses_counts_as_values() {
        let data = SeriesData::Slices {
            slices: vec![
                PieSlice { label: "A".to_string(), count: 3, percentage: 75.0 },
                PieSlice { label: "B".to_string(), count: 1, percentage: 25.0 },
            ],
        };
        let figure = to_figure(&ChartSeries::new("pie", ChartKind::Pie, layout(), data));

        assert_eq!(figure["data"][0]["type"], "pie");
        assert_eq!(figure["data"][0]["values"], json!([3, 1]));
    }

    #[test]
    fn sunburst_parents_carry_totals() {
        let leaf = |os: &str, range, count| HierarchyLeaf {
            brand: "Acme".to_string(),
            os: os.to_string(),
            price_range: range,
            count,
        };
        let data = SeriesData::Hierarchy {
            leaves: vec![
                leaf("Linux", PriceRange::Budget, 2),
                leaf("Linux", PriceRange::Luxury, 1),
                leaf("Windows", PriceRange::Budget, 4),
            ],
        };
        let figure = to_figure(&ChartSeries::new("sun", ChartKind::Sunburst, layout(), data));
        let trace = &figure["data"][0];

        let ids: Vec<&str> = trace["ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let acme = ids.iter().position(|id| *id == "Acme").unwrap();
        let linux = ids.iter().position(|id| *id == "Acme/Linux").unwrap();

        assert_eq!(trace["values"][acme], 7);
        assert_eq!(trace["values"][linux], 3);
        assert_eq!(trace["parents"][linux], "Acme");
        assert_eq!(trace["parents"][acme], "");
    }
}
