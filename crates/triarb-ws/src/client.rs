//! WebSocket client lifecycle.
//!
//! Connects once, subscribes the configured ticker topics, forwards pushes
//! to the feed layer, and answers the keepalive cadence. There is no
//! reconnect: a transport error ends the subscription and is surfaced to
//! the orchestrator. The subscription is released (unsubscribe + close)
//! on every exit path, exactly once, before `run` returns.

use crate::error::{WsError, WsResult};
use crate::message::{SubscriptionId, TickerPush, WsEvent, WsRequest};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket endpoint URL.
    pub url: String,
    /// Keepalive ping interval.
    pub ping_interval_ms: u64,
    /// Ticker topics to subscribe on connect.
    pub topics: Vec<String>,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            ping_interval_ms: 18_000,
            topics: Vec::new(),
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Disconnected,
    Connecting,
    Connected,
    Stopped,
}

/// Streaming ticker client.
pub struct WsClient {
    config: WsConfig,
    state: Arc<RwLock<ClientState>>,
    next_id: AtomicU64,
    message_tx: mpsc::Sender<TickerPush>,
    shutdown_token: CancellationToken,
}

impl WsClient {
    /// Create a new client. Pushes are delivered over `message_tx`.
    pub fn new(config: WsConfig, message_tx: mpsc::Sender<TickerPush>) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ClientState::Disconnected)),
            next_id: AtomicU64::new(1),
            message_tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get current connection state.
    pub fn state(&self) -> ClientState {
        *self.state.read()
    }

    /// Signal graceful shutdown.
    ///
    /// The run loop releases its subscriptions and exits promptly.
    pub fn shutdown(&self) {
        info!("WsClient shutdown requested");
        self.shutdown_token.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Connect, subscribe, and run the delivery loop until shutdown or a
    /// terminal transport error.
    pub async fn run(&self) -> WsResult<()> {
        *self.state.write() = ClientState::Connecting;
        info!(url = %self.config.url, "Connecting to ticker stream");

        let (ws_stream, _response) = match connect_async(&self.config.url).await {
            Ok(pair) => pair,
            Err(e) => {
                *self.state.write() = ClientState::Disconnected;
                return Err(WsError::ConnectionFailed(e.to_string()));
            }
        };
        let (mut write, mut read) = ws_stream.split();

        *self.state.write() = ClientState::Connected;
        info!("Ticker stream connected");

        // Subscribe every configured topic once; the bindings stay
        // registered until teardown.
        let mut subscriptions: Vec<(SubscriptionId, String)> = Vec::new();
        for topic in &self.config.topics {
            let sub_id = SubscriptionId(self.next_id());
            let request = WsRequest::subscribe(sub_id, topic.clone());
            if let Err(e) = self.send_request(&mut write, &request).await {
                self.release(&mut write, &subscriptions).await;
                *self.state.write() = ClientState::Stopped;
                return Err(e);
            }
            info!(subscription_id = %sub_id, topic = %topic, "Subscribed");
            subscriptions.push((sub_id, topic.clone()));
        }

        let mut ping_interval = tokio::time::interval(Duration::from_millis(
            self.config.ping_interval_ms.max(1),
        ));
        // The first tick fires immediately; skip it so pings start one
        // interval after connect.
        ping_interval.tick().await;

        let result = loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in delivery loop");
                    break Ok(());
                }

                _ = ping_interval.tick() => {
                    let request = WsRequest::ping(self.next_id());
                    if let Err(e) = self.send_request(&mut write, &request).await {
                        break Err(e);
                    }
                }

                msg = read.next() => match msg {
                    None => break Err(WsError::ConnectionClosed),
                    Some(Err(e)) => break Err(WsError::Tungstenite(e)),
                    Some(Ok(Message::Text(text))) => {
                        match self.handle_text(&text).await {
                            Ok(true) => {}
                            Ok(false) => break Ok(()),
                            Err(e) => break Err(e),
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if let Err(e) = write.send(Message::Pong(payload)).await {
                            break Err(WsError::Tungstenite(e));
                        }
                    }
                    Some(Ok(Message::Close(_))) => break Err(WsError::ConnectionClosed),
                    Some(Ok(_)) => {}
                },
            }
        };

        self.release(&mut write, &subscriptions).await;
        *self.state.write() = ClientState::Stopped;
        result
    }

    /// Handle one text frame. Returns Ok(false) when the push receiver is
    /// gone and the loop should stop.
    async fn handle_text(&self, text: &str) -> WsResult<bool> {
        match serde_json::from_str::<WsEvent>(text) {
            Ok(WsEvent::Message { topic, subject, data }) => {
                let push = TickerPush {
                    topic,
                    subject: subject.unwrap_or_default(),
                    data,
                };
                if self.message_tx.send(push).await.is_err() {
                    debug!("Push receiver dropped, stopping delivery");
                    return Ok(false);
                }
            }
            Ok(WsEvent::Welcome { id }) => debug!(?id, "Welcome received"),
            Ok(WsEvent::Ack { id }) => debug!(?id, "Subscription acknowledged"),
            Ok(WsEvent::Pong { .. }) => {}
            Ok(WsEvent::Error { code, data }) => {
                return Err(WsError::ServerError {
                    code: code.map(|c| c.to_string()).unwrap_or_default(),
                    message: data.unwrap_or_default(),
                });
            }
            Err(e) => {
                // Unknown frame shapes are skipped, never fatal.
                warn!(?e, frame = %text, "Unrecognized frame");
            }
        }
        Ok(true)
    }

    async fn send_request(&self, write: &mut WsSink, request: &WsRequest) -> WsResult<()> {
        let text = serde_json::to_string(request)?;
        write
            .send(Message::Text(text))
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))
    }

    /// Release every subscription and close the socket. Best effort: the
    /// peer may already be gone on error paths.
    async fn release(&self, write: &mut WsSink, subscriptions: &[(SubscriptionId, String)]) {
        for (sub_id, topic) in subscriptions {
            let request = WsRequest::unsubscribe(*sub_id, topic.clone());
            match self.send_request(write, &request).await {
                Ok(()) => debug!(subscription_id = %sub_id, topic = %topic, "Unsubscribed"),
                Err(e) => {
                    warn!(?e, "Unsubscribe failed during teardown");
                    break;
                }
            }
        }
        if let Err(e) = write.send(Message::Close(None)).await {
            debug!(?e, "Close frame not delivered");
        }
        info!("Subscription released");
    }
}
