//! Main application orchestration.
//!
//! Wires the transport, feed, and engine together:
//! - WebSocket ticker streaming for the triangle's three symbols
//! - Quote dispatch into shared price state
//! - The arbitrage evaluation loop
//!
//! Streaming and evaluation run as sibling tasks; whichever exits first,
//! for any reason, takes the other down with it.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use triarb_core::Triangle;
use triarb_engine::ArbitrageEngine;
use triarb_feed::{BindingSet, SharedQuote};
use triarb_ws::{ticker_topic, TickerPush, WsClient, WsConfig};

/// Main application.
pub struct Application {
    config: AppConfig,
    triangle: Triangle,
}

impl Application {
    /// Create a new application.
    ///
    /// All configuration validation happens here: an unsupported market
    /// kind or a symbol/kind mismatch fails before any task is spawned.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let triangle = config.triangle()?;
        Ok(Self { config, triangle })
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Run until one activity exits or a shutdown signal arrives.
    pub async fn run(self) -> AppResult<()> {
        let kind = self.triangle.kind;
        info!(
            first = %self.triangle.first,
            intermediary = %self.triangle.intermediary,
            last = %self.triangle.last,
            kind = %kind,
            "Starting arbitrage monitor"
        );

        // Shared quotes, one per symbol, written by the dispatcher and
        // read by the engine.
        let first = SharedQuote::new(&self.triangle.first);
        let intermediary = SharedQuote::new(&self.triangle.intermediary);
        let last = SharedQuote::new(&self.triangle.last);

        let mut bindings = BindingSet::new();
        for quote in [&first, &intermediary, &last] {
            bindings.register(quote.clone());
        }

        let (message_tx, mut message_rx) =
            mpsc::channel::<TickerPush>(self.config.websocket.channel_capacity);

        let ws_config = WsConfig {
            url: self.config.ws_url.clone(),
            ping_interval_ms: self.config.websocket.ping_interval_ms,
            topics: self
                .triangle
                .symbols()
                .iter()
                .map(|symbol| ticker_topic(kind, symbol))
                .collect(),
        };
        let client = Arc::new(WsClient::new(ws_config, message_tx));

        let engine = Arc::new(ArbitrageEngine::new(
            self.triangle.clone(),
            first,
            intermediary,
            last,
            self.config.engine.clone(),
        ));
        let cancel = CancellationToken::new();

        // Spawn the two activities plus the dispatcher between them.
        let mut ws_handle = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.run().await }
        });
        let mut engine_handle = tokio::spawn({
            let engine = Arc::clone(&engine);
            let cancel = cancel.clone();
            async move { engine.run(cancel).await }
        });
        let dispatch_handle = tokio::spawn(async move {
            while let Some(push) = message_rx.recv().await {
                bindings.dispatch(&push);
            }
        });

        // Whichever activity finishes first ends the run; the sibling is
        // then shut down and awaited so teardown completes exactly once.
        let mut ws_result: Option<AppResult<()>> = None;
        let mut engine_result: Option<AppResult<()>> = None;
        tokio::select! {
            res = &mut ws_handle => {
                warn!("Streaming activity exited first");
                ws_result = Some(flatten_ws(res));
            }
            res = &mut engine_handle => {
                warn!("Evaluation activity exited first");
                engine_result = Some(flatten_engine(res));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }

        cancel.cancel();
        client.shutdown();

        let ws_result = match ws_result {
            Some(result) => result,
            None => flatten_ws(ws_handle.await),
        };
        let engine_result = match engine_result {
            Some(result) => result,
            None => flatten_engine(engine_handle.await),
        };
        dispatch_handle.abort();

        if let Err(e) = &ws_result {
            error!(error = %e, "Streaming activity failed");
        }
        if let Err(e) = &engine_result {
            error!(error = %e, "Evaluation activity failed");
        }
        info!("Arbitrage monitor stopped");

        ws_result.and(engine_result)
    }
}

fn flatten_ws(res: Result<triarb_ws::WsResult<()>, tokio::task::JoinError>) -> AppResult<()> {
    res.map_err(AppError::Join)?.map_err(AppError::WebSocket)
}

fn flatten_engine(
    res: Result<triarb_engine::EngineResult<()>, tokio::task::JoinError>,
) -> AppResult<()> {
    res.map_err(AppError::Join)?.map_err(AppError::Engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_kind(kind: &str) -> AppConfig {
        toml::from_str(&format!(
            r#"
                market_kind = "{kind}"
                first_symbol = "BTC-USDT"
                intermediary_symbol = "ETH-BTC"
                last_symbol = "ETH-USDT"
            "#
        ))
        .unwrap()
    }

    #[test]
    fn test_new_validates_market_kind() {
        assert!(Application::new(config_with_kind("spot")).is_ok());
        assert!(matches!(
            Application::new(config_with_kind("margin")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_new_builds_triangle() {
        let app = Application::new(config_with_kind("spot")).unwrap();
        assert_eq!(
            app.triangle().symbols(),
            ["BTC-USDT", "ETH-BTC", "ETH-USDT"]
        );
    }
}
