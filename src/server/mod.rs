//! HTTP server for the statistics and charts pages

mod error;
mod handlers;
mod pages;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use crate::charts::ChartOptions;
use crate::loader::load_dataset;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: "127.0.0.1")
    pub host: String,
    /// Server port (default: 5001)
    pub port: u16,
    /// Path to the listings CSV
    pub dataset_path: PathBuf,
    /// Chart derivation tunables
    pub chart_options: ChartOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
            dataset_path: PathBuf::from("computer_prices_all.csv"),
            chart_options: ChartOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `DATASET_PATH` and `SCATTER_MAX_POINTS`, falling
    /// back to the defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let mut chart_options = defaults.chart_options;
        if let Some(max) = lookup("SCATTER_MAX_POINTS").and_then(|v| v.parse().ok()) {
            chart_options.scatter_max_points = max;
        }

        ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            dataset_path: lookup("DATASET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            chart_options,
        }
    }
}

/// Loads the dataset and runs the dashboard server
///
/// # Errors
/// Fails before binding when the dataset cannot be loaded, so the server
/// never serves pages without data.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let dataset = load_dataset(&config.dataset_path).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let state = Arc::new(AppState::new(dataset, config.chart_options));
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn config_reads_overrides() {
        let env = HashMap::from([
            ("PORT", "8080"),
            ("DATASET_PATH", "/data/listings.csv"),
            ("SCATTER_MAX_POINTS", "500"),
        ]);
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.dataset_path, PathBuf::from("/data/listings.csv"));
        assert_eq!(config.chart_options.scatter_max_points, 500);
    }

    #[test]
    fn config_ignores_unparsable_port() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 5001);
    }
}
