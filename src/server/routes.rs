//! Route definitions for the dashboard server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // Read-only API, any origin may fetch it
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::statistics_page))
        .route("/statistics", get(handlers::statistics_page))
        .route("/charts", get(handlers::charts_page))
        // JSON API
        .route("/api/statistics", get(handlers::get_statistics))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/charts", get(handlers::get_charts))
        .route("/api/charts/series", get(handlers::get_chart_series))
        // Health check
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
