//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] triarb_ws::WsError),

    #[error("Feed error: {0}")]
    Feed(#[from] triarb_feed::FeedError),

    #[error("Engine error: {0}")]
    Engine(#[from] triarb_engine::EngineError),

    #[error("REST error: {0}")]
    Rest(#[from] triarb_rest::RestError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] triarb_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] triarb_telemetry::TelemetryError),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
