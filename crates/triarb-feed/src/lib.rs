//! Ticker event parsing and shared price state.
//!
//! Sits between the WebSocket transport and the evaluation engine: raw
//! pushes come in, typed quote updates go out. Each subscribed symbol has
//! one [`SharedQuote`] written by its [`StreamBinding`] and read by the
//! engine's sampling loop.

pub mod binding;
pub mod error;
pub mod event;
pub mod quote;

pub use binding::{BindingSet, StreamBinding};
pub use error::{FeedError, FeedResult};
pub use event::{parse_ticker, FuturesTicker, SpotTicker};
pub use quote::SharedQuote;
