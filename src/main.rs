//! Housing Dashboard Server
//!
//! Serves the dashboard API and WebSocket on the configured address.

use anyhow::Context;
use clap::Parser;
use housing_dashboard::api::{serve, AppState};
use housing_dashboard::config::{init_logging, Config};
use housing_dashboard::dashboard::Dashboard;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "housing-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "US housing market dashboard server")]
struct Args {
    /// Config file (default: ./housing.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref()).context("Failed to load config")?;
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_logging(&config.logging);

    tracing::info!("Housing Dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Housing data: {}", config.data.housing_path);
    tracing::info!("Mortgage data: {}", config.data.mortgage_path);
    tracing::info!("Rent data: {}", config.data.rents_path);

    let dashboard = Arc::new(Dashboard::new(config.data.clone(), config.cache.clone()));

    // Warm the housing cache so the first page load is fast
    let warm = Arc::clone(&dashboard);
    match tokio::task::spawn_blocking(move || warm.options()).await? {
        Ok(options) => tracing::info!(
            states = options.states.len(),
            property_types = options.property_types.len(),
            "Housing data loaded, bounds {}",
            options.date_bounds
        ),
        Err(e) => tracing::warn!("Housing data not loaded at startup: {}", e),
    }

    let state = AppState::new(dashboard, config.api.clone());
    serve(state, &config.api).await?;

    Ok(())
}
