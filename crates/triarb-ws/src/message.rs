//! WebSocket message types for the public feed protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use triarb_core::MarketKind;

/// Opaque subscription identifier.
///
/// Only useful for correlating acks and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outgoing client request.
///
/// The feed expects ids as strings; `WsRequest::*` constructors take the
/// numeric id and serialize it accordingly.
#[derive(Debug, Clone, Serialize)]
pub struct WsRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<bool>,
}

impl WsRequest {
    /// Subscribe to a topic, requesting an ack.
    pub fn subscribe(id: SubscriptionId, topic: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            request_type: "subscribe".to_string(),
            topic: Some(topic.into()),
            response: Some(true),
        }
    }

    /// Unsubscribe from a topic.
    pub fn unsubscribe(id: SubscriptionId, topic: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            request_type: "unsubscribe".to_string(),
            topic: Some(topic.into()),
            response: Some(true),
        }
    }

    /// Keepalive ping.
    pub fn ping(id: u64) -> Self {
        Self {
            id: id.to_string(),
            request_type: "ping".to_string(),
            topic: None,
            response: None,
        }
    }
}

/// Incoming server event, discriminated by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WsEvent {
    /// Sent once after the connection is accepted.
    Welcome {
        #[serde(default)]
        id: Option<String>,
    },
    /// Acknowledges a subscribe/unsubscribe request.
    Ack {
        #[serde(default)]
        id: Option<String>,
    },
    /// Keepalive response.
    Pong {
        #[serde(default)]
        id: Option<String>,
    },
    /// A data push on a subscribed topic.
    Message {
        topic: String,
        #[serde(default)]
        subject: Option<String>,
        data: serde_json::Value,
    },
    /// Server-side error.
    Error {
        #[serde(default)]
        code: Option<serde_json::Value>,
        #[serde(default)]
        data: Option<String>,
    },
}

/// One ticker push, as forwarded to the feed layer.
///
/// The transport only routes; field extraction from `data` is the feed
/// binding's job.
#[derive(Debug, Clone)]
pub struct TickerPush {
    pub topic: String,
    pub subject: String,
    pub data: serde_json::Value,
}

/// Build the ticker topic for one symbol.
///
/// Spot and futures tickers live on different endpoint families with
/// different payload shapes; the topic prefix selects between them.
pub fn ticker_topic(kind: MarketKind, symbol: &str) -> String {
    match kind {
        MarketKind::Spot => format!("/market/ticker:{symbol}"),
        MarketKind::Futures => format!("/contractMarket/tickerV2:{symbol}"),
    }
}

/// Extract the symbol from a ticker topic (the part after the colon).
pub fn topic_symbol(topic: &str) -> Option<&str> {
    topic.split_once(':').map(|(_, symbol)| symbol)
}
