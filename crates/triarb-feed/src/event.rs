//! Ticker payload shapes and field extraction.
//!
//! Spot and futures tickers carry the same information under different
//! field names. `parse_ticker` is the single place that knows about both
//! shapes; everything downstream works with `(best_ask, best_bid)` pairs.

use crate::error::{FeedError, FeedResult};
use serde::Deserialize;
use triarb_core::{MarketKind, Price};

/// Spot ticker push payload. Prices arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotTicker {
    #[serde(rename = "bestAsk")]
    pub best_ask: Price,
    #[serde(rename = "bestBid")]
    pub best_bid: Price,
}

/// Futures ticker push payload.
///
/// The futures feed may deliver prices as JSON numbers rather than
/// strings; `Price`'s serde impl accepts both via `rust_decimal`.
#[derive(Debug, Clone, Deserialize)]
pub struct FuturesTicker {
    #[serde(rename = "bestAskPrice")]
    pub best_ask: Price,
    #[serde(rename = "bestBidPrice")]
    pub best_bid: Price,
}

/// Extract `(best_ask, best_bid)` from a raw ticker payload.
///
/// The market kind selects the field mapping; a payload missing either
/// side is rejected whole rather than half-applied.
pub fn parse_ticker(kind: MarketKind, data: &serde_json::Value) -> FeedResult<(Price, Price)> {
    match kind {
        MarketKind::Spot => {
            let ticker: SpotTicker = serde_json::from_value(data.clone())
                .map_err(|e| FeedError::Parse(format!("spot ticker: {e}")))?;
            Ok((ticker.best_ask, ticker.best_bid))
        }
        MarketKind::Futures => {
            let ticker: FuturesTicker = serde_json::from_value(data.clone())
                .map_err(|e| FeedError::Parse(format!("futures ticker: {e}")))?;
            Ok((ticker.best_ask, ticker.best_bid))
        }
    }
}
