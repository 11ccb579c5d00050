//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use triarb_core::{MarketKind, Triangle};
use triarb_engine::EngineConfig;

/// WebSocket connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsSettings {
    /// Keepalive ping interval (ms).
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
    /// Push channel capacity between transport and dispatcher.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_ping_interval_ms() -> u64 {
    18_000
}

fn default_channel_capacity() -> usize {
    1_000
}

impl Default for WsSettings {
    fn default() -> Self {
        Self {
            ping_interval_ms: default_ping_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Market kind for all three symbols: "spot" or "futures".
    #[serde(default = "default_market_kind")]
    pub market_kind: String,
    /// The directly quoted pair whose price the triangle implies.
    pub first_symbol: String,
    /// The conversion pair.
    pub intermediary_symbol: String,
    /// The closing pair.
    pub last_symbol: String,
    /// WebSocket endpoint URL.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// REST API base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// WebSocket settings.
    #[serde(default)]
    pub websocket: WsSettings,
    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_market_kind() -> String {
    "spot".to_string()
}

fn default_ws_url() -> String {
    "wss://ws-api-spot.kucoin.com".to_string()
}

fn default_rest_url() -> String {
    "https://api.kucoin.com".to_string()
}

impl AppConfig {
    /// Load from a TOML file. Path resolution (CLI flag, `TRIARB_CONFIG`,
    /// default location) is the entry point's job.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Parse the configured market kind.
    ///
    /// An unsupported kind (e.g. "margin") is a configuration error; the
    /// caller must reject it before starting any activity.
    pub fn market_kind(&self) -> AppResult<MarketKind> {
        MarketKind::from_str(&self.market_kind).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Build the validated triangle from the configured symbols.
    pub fn triangle(&self) -> AppResult<Triangle> {
        let kind = self.market_kind()?;
        Triangle::new(
            self.first_symbol.clone(),
            self.intermediary_symbol.clone(),
            self.last_symbol.clone(),
            kind,
        )
        .map_err(|e| AppError::Config(e.to_string()))
    }
}
