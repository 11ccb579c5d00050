//! Historical kline backfill tool.
//!
//! Fetches candles for one symbol over a date range and appends them to a
//! CSV file. Intended for ad-hoc dataset preparation, not for the live
//! monitor.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use triarb_persistence::KlineCsvWriter;
use triarb_rest::{KlineInterval, MarketClient};

/// Kline backfill tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Symbol to fetch (e.g. BTC-USDT)
    #[arg(short, long)]
    symbol: String,

    /// Candle interval (1min, 5min, 15min, 30min, 1hour, 4hour, 1day)
    #[arg(short, long, default_value = "1min")]
    interval: String,

    /// Number of days of history to fetch, ending now
    #[arg(short, long, default_value_t = 7)]
    days: i64,

    /// Output CSV path
    #[arg(short, long, default_value = "klines.csv")]
    output: String,

    /// REST API base URL
    #[arg(long, default_value = "https://api.kucoin.com")]
    rest_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    triarb_telemetry::init_logging()?;

    let args = Args::parse();
    let interval: KlineInterval = args
        .interval
        .parse()
        .with_context(|| format!("unsupported interval: {}", args.interval))?;

    let end_at = chrono::Utc::now().timestamp();
    let start_at = end_at - args.days * 86_400;

    info!(
        symbol = %args.symbol,
        interval = %interval,
        start_at,
        end_at,
        output = %args.output,
        "Starting kline backfill"
    );

    let client = MarketClient::new(&args.rest_url)?;
    let klines = client
        .fetch_all_klines(&args.symbol, interval, start_at, end_at)
        .await
        .context("kline fetch failed")?;

    info!(rows = klines.len(), "Fetch complete, writing CSV");

    let mut writer = KlineCsvWriter::new(&args.output);
    for kline in klines {
        writer.add_record(kline)?;
    }
    writer.close()?;

    info!(
        rows = writer.rows_written(),
        output = %args.output,
        "Backfill complete"
    );
    Ok(())
}
