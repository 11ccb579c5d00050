//! REST market-data access.
//!
//! Covers the two request shapes the tools need: a level-1 ticker
//! snapshot and paginated historical candles.

pub mod client;
pub mod error;
pub mod kline;

pub use client::{Level1, MarketClient};
pub use error::{RestError, RestResult};
pub use kline::{Kline, KlineInterval};
