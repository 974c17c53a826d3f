//! Static HTML for the two dashboard pages. Both pages fetch their data from
//! the JSON API after load.

pub const STATISTICS: &str = include_str!("pages/statistics.html");
pub const CHARTS: &str = include_str!("pages/charts.html");
