//! REST client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: code={code}, message={message}")]
    Api { code: String, message: String },

    #[error("Malformed response row: {0}")]
    Decode(String),

    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error(transparent)]
    Core(#[from] triarb_core::CoreError),
}

pub type RestResult<T> = Result<T, RestError>;
