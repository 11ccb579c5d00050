//! WebSocket streaming client for market ticker subscriptions.
//!
//! Speaks the KuCoin-style public feed protocol: subscribe/unsubscribe
//! requests with numeric ids, ping/pong keepalive, and ticker pushes
//! carrying a topic, subject, and payload. A transport failure is terminal
//! for the subscription; there is no automatic reconnect.

pub mod client;
pub mod error;
pub mod message;

pub use client::{ClientState, WsClient, WsConfig};
pub use error::{WsError, WsResult};
pub use message::{ticker_topic, topic_symbol, SubscriptionId, TickerPush, WsEvent, WsRequest};

/// Initialize the rustls crypto provider.
///
/// Must be called once before any TLS WebSocket connection is opened.
pub fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
