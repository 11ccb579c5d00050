//! Engine error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine terminated before initialization completed")]
    InitInterrupted,

    #[error(transparent)]
    Core(#[from] triarb_core::CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
