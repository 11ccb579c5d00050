//! The triangle of trading pairs under evaluation.

use crate::error::{CoreError, Result};
use crate::quote::MarketKind;
use serde::{Deserialize, Serialize};

/// Three related trading pairs plus their shared market kind.
///
/// The pairs must satisfy `first ≈ intermediary × last` (or its algebraic
/// inverse) under a no-arbitrage assumption. That relationship is a caller
/// responsibility and is not validated here; only the market-kind tag and
/// its consistency with symbol syntax are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// The pair whose price is implied by the other two (e.g. "BTC-USDT").
    pub first: String,
    /// The conversion pair (e.g. "ETH-BTC").
    pub intermediary: String,
    /// The closing pair (e.g. "ETH-USDT").
    pub last: String,
    /// Market kind shared by all three symbols.
    pub kind: MarketKind,
}

impl Triangle {
    /// Build a triangle, validating the market-kind tag and that every
    /// symbol's syntax-derived kind matches it.
    pub fn new(
        first: impl Into<String>,
        intermediary: impl Into<String>,
        last: impl Into<String>,
        kind: MarketKind,
    ) -> Result<Self> {
        let triangle = Self {
            first: first.into(),
            intermediary: intermediary.into(),
            last: last.into(),
            kind,
        };

        for symbol in triangle.symbols() {
            if MarketKind::from_symbol(symbol) != kind {
                return Err(CoreError::MismatchedMarketKind {
                    symbol: symbol.to_string(),
                    expected: kind,
                });
            }
        }

        Ok(triangle)
    }

    /// The three symbols in first/intermediary/last order.
    pub fn symbols(&self) -> [&str; 3] {
        [&self.first, &self.intermediary, &self.last]
    }
}
