//! Triangular arbitrage monitor application.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::{AppConfig, WsSettings};
pub use error::{AppError, AppResult};
