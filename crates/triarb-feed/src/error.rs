//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Malformed ticker payload: {0}")]
    Parse(String),

    #[error("No binding registered for symbol {0}")]
    UnknownSymbol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] triarb_core::CoreError),
}

pub type FeedResult<T> = Result<T, FeedError>;
