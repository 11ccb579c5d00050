//! Triangular arbitrage evaluation.
//!
//! The engine observes three quotes (direct pair, intermediary leg,
//! closing leg), waits until all are operational, then compares the
//! implied cross price against the directly quoted one on a fixed
//! cadence.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{EngineConfig, InitWaitMode};
pub use engine::{ArbitrageEngine, EngineState};
pub use error::{EngineError, EngineResult};
