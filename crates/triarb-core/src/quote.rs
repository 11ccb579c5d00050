//! Per-symbol price state.
//!
//! `PairQuote` holds the latest best bid/ask for one trading pair. Both
//! prices start at the zero sentinel; the quote is *operational* once both
//! sides have been populated by at least one stream update.

use crate::error::{CoreError, Result};
use crate::Price;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market kind: spot vs. futures event shape and endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Spot market (symbols with a `-` separator, e.g. "BTC-USDT").
    Spot,
    /// Futures/derivative market (e.g. "XBTUSDTM").
    Futures,
}

impl MarketKind {
    /// Derive the kind from symbol syntax: a separator implies spot.
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.contains('-') {
            Self::Spot
        } else {
            Self::Futures
        }
    }
}

impl FromStr for MarketKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spot" => Ok(Self::Spot),
            "futures" => Ok(Self::Futures),
            other => Err(CoreError::InvalidMarketKind(other.to_string())),
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Futures => write!(f, "futures"),
        }
    }
}

/// Best bid/ask state for one trading pair.
///
/// Mutated exclusively by the pair's stream binding; lives for the whole
/// lifetime of the subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairQuote {
    /// Trading pair symbol (e.g. "BTC-USDT", "XBTUSDTM").
    pub symbol: String,
    /// Market kind, derived from symbol syntax.
    pub kind: MarketKind,
    /// Best ask price. Zero until the first update.
    pub best_ask: Price,
    /// Best bid price. Zero until the first update.
    pub best_bid: Price,
}

impl PairQuote {
    /// Create a quote with both sides at the unset sentinel.
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let kind = MarketKind::from_symbol(&symbol);
        Self {
            symbol,
            kind,
            best_ask: Price::ZERO,
            best_bid: Price::ZERO,
        }
    }

    /// Unconditional overwrite of both sides.
    ///
    /// No monotonicity or staleness validation; a malformed upstream
    /// event is rejected by the stream binding before this is called.
    pub fn update(&mut self, ask: Price, bid: Price) {
        self.best_ask = ask;
        self.best_bid = bid;
    }

    /// True once both ask and bid are non-zero.
    pub fn is_operational(&self) -> bool {
        !self.best_ask.is_zero() && !self.best_bid.is_zero()
    }
}
