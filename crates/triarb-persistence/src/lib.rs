//! Durable storage for fetched market history.

pub mod error;
pub mod writer;

pub use error::{PersistenceError, PersistenceResult};
pub use writer::KlineCsvWriter;
