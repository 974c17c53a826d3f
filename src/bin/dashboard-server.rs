//! Dashboard Server Binary
//!
//! Run with: `cargo run --bin dashboard-server`

use dashboard::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is initialized in run_server(); RUST_LOG controls the filter:
    //   RUST_LOG=debug cargo run --bin dashboard-server
    //   RUST_LOG=dashboard::charts=debug cargo run --bin dashboard-server
    let config = ServerConfig::from_env();

    println!("Starting Computer Prices Dashboard...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Dataset: {}", config.dataset_path.display());
    println!();
    println!("Available endpoints:");
    println!("  GET  /statistics           - Descriptive statistics page");
    println!("  GET  /charts               - Charts page");
    println!("  GET  /api/statistics       - Per-column statistics");
    println!("  GET  /api/summary          - Headline figures");
    println!("  GET  /api/charts           - Plotly figures");
    println!("  GET  /api/charts/series    - Raw chart series");
    println!("  GET  /health               - Health check");
    println!();

    // Exits non-zero when the dataset cannot be loaded
    run_server(config).await?;

    Ok(())
}
