//! Triangular arbitrage evaluation.
//!
//! One `ArbitrageSample` is produced per evaluation tick and reported
//! outward; no history is retained here.

use crate::quote::PairQuote;
use crate::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book drives the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Buy `first` at its ask, convert through `intermediary`'s ask,
    /// close at `last`'s bid.
    Ask,
    /// The mirrored path using bids where Ask uses asks and vice versa.
    Bid,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Bid => write!(f, "bid"),
        }
    }
}

/// One evaluation of the triangular edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageSample {
    /// Price of `first` implied by chaining `intermediary` and `last`.
    pub implied_price: Price,
    /// Observed price of `first`.
    pub real_price: Price,
    /// `implied - real`.
    pub absolute_difference: Decimal,
    /// `(implied - real) / real * 100` — the edge signal.
    pub percentage_difference: Decimal,
    /// Side of the book this sample was computed from.
    pub direction: Direction,
    /// Evaluation timestamp.
    pub computed_at: DateTime<Utc>,
}

impl ArbitrageSample {
    /// Compute one sample from the three quotes.
    ///
    /// Ask direction: `implied = (1 / intermediary.ask) * last.bid`,
    /// `real = first.ask`. When implied exceeds real, buying `first`
    /// directly and converting through `intermediary` then `last` is
    /// favorable. Bid direction swaps bids and asks throughout.
    ///
    /// Returns None when the divisor price or the real price is zero;
    /// neither can occur once all three quotes are operational, but the
    /// guard stays in case the init gate strategy changes.
    pub fn compute(
        direction: Direction,
        first: &PairQuote,
        intermediary: &PairQuote,
        last: &PairQuote,
    ) -> Option<Self> {
        let (chain_price, close_price, real_price) = match direction {
            Direction::Ask => (intermediary.best_ask, last.best_bid, first.best_ask),
            Direction::Bid => (intermediary.best_bid, last.best_ask, first.best_bid),
        };

        if chain_price.is_zero() || real_price.is_zero() {
            return None;
        }

        // Single division keeps the exact no-arbitrage case exact:
        // close / chain == (1 / chain) * close.
        let implied_price = Price::new(close_price.inner() / chain_price.inner());
        let absolute_difference = implied_price.inner() - real_price.inner();
        let percentage_difference = implied_price.pct_from(real_price)?;

        Some(Self {
            implied_price,
            real_price,
            absolute_difference,
            percentage_difference,
            direction,
            computed_at: Utc::now(),
        })
    }
}
