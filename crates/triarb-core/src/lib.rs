//! Core domain types for the triangular arbitrage monitor.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `Price`: precision-safe decimal price
//! - `MarketKind`: spot vs. futures market shape
//! - `PairQuote`: per-symbol best bid/ask state
//! - `Triangle`: the three related trading pairs under evaluation
//! - `ArbitrageSample`: one evaluation of the triangular edge

pub mod decimal;
pub mod error;
pub mod quote;
pub mod sample;
pub mod triangle;

pub use decimal::Price;
pub use error::{CoreError, Result};
pub use quote::{MarketKind, PairQuote};
pub use sample::{ArbitrageSample, Direction};
pub use triangle::Triangle;
