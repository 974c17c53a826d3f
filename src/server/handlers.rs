//! HTTP request handlers for pages and API endpoints

use axum::{
    extract::State,
    http::Uri,
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use super::pages;
use super::state::AppState;
use crate::charts::{to_figure, ChartKind, ChartSeries, ChartSpecBuilder};
use crate::stats::{DatasetStatistics, HeadlineFigures, StatisticsEngine};

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub data_loaded: bool,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// GET /health - Health check
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        data_loaded: true,
        rows: state.dataset.row_count(),
        loaded_at: state.dataset.loaded_at(),
    })
}

/// GET / and GET /statistics - Descriptive statistics page
pub async fn statistics_page() -> Html<&'static str> {
    Html(pages::STATISTICS)
}

/// GET /charts - Visualizations page
pub async fn charts_page() -> Html<&'static str> {
    Html(pages::CHARTS)
}

/// GET /api/statistics - Per-column descriptive statistics
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetStatistics>, ApiError> {
    let dataset = Arc::clone(&state.dataset);
    let statistics =
        tokio::task::spawn_blocking(move || StatisticsEngine::new(&dataset).compute()).await?;
    Ok(Json(statistics))
}

/// GET /api/summary - Headline figures
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HeadlineFigures>, ApiError> {
    let dataset = Arc::clone(&state.dataset);
    let headline = tokio::task::spawn_blocking(move || HeadlineFigures::compute(&dataset)).await?;
    Ok(Json(headline))
}

/// One rendered chart
#[derive(Debug, Serialize)]
pub struct ChartFigure {
    pub id: &'static str,
    pub kind: ChartKind,
    pub figure: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Response for the charts endpoint, in page order
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub charts: Vec<ChartFigure>,
}

/// GET /api/charts - Plotly figures for the charts page
pub async fn get_charts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartsResponse>, ApiError> {
    let series = build_series(&state).await?;
    let charts = series
        .iter()
        .map(|series| ChartFigure {
            id: series.id,
            kind: series.kind,
            figure: to_figure(series),
            notice: series.notice.clone(),
        })
        .collect();
    Ok(Json(ChartsResponse { charts }))
}

/// GET /api/charts/series - Raw chart series
pub async fn get_chart_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChartSeries>>, ApiError> {
    Ok(Json(build_series(&state).await?))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri)
}

async fn build_series(state: &AppState) -> Result<Vec<ChartSeries>, ApiError> {
    let dataset = Arc::clone(&state.dataset);
    let options = state.chart_options;
    let series = tokio::task::spawn_blocking(move || {
        ChartSpecBuilder::with_options(&dataset, options).build_all()
    })
    .await?;
    Ok(series)
}
