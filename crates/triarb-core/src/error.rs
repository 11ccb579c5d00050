//! Error types for triarb-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid market kind: {0} (expected \"spot\" or \"futures\")")]
    InvalidMarketKind(String),

    #[error("Symbol {symbol} is not a {expected} symbol")]
    MismatchedMarketKind {
        symbol: String,
        expected: crate::MarketKind,
    },

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
