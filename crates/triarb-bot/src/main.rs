//! Triangular arbitrage monitor - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Triangular arbitrage monitor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via TRIARB_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // TLS provider must be installed before any WS connection
    triarb_ws::init_crypto();

    let args = Args::parse();

    triarb_telemetry::init_logging()?;

    info!("Starting triarb-bot v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var("TRIARB_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = triarb_bot::AppConfig::from_file(&config_path)?;

    let app = triarb_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
