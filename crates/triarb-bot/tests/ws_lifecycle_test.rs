//! WebSocket lifecycle integration tests.
//!
//! Covers the subscription lifecycle end to end:
//! - Connection establishment and topic subscription
//! - Push flow from the transport into shared quotes
//! - Subscription release on shutdown and on transport failure

mod integration;
use integration::common::mock_ws::MockWsServer;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use triarb_core::MarketKind;
use triarb_feed::{BindingSet, SharedQuote};
use triarb_ws::{ticker_topic, ClientState, TickerPush, WsClient, WsConfig, WsError};

fn client_config(url: String, symbols: &[&str]) -> WsConfig {
    WsConfig {
        url,
        ping_interval_ms: 60_000,
        topics: symbols
            .iter()
            .map(|s| ticker_topic(MarketKind::from_symbol(s), s))
            .collect(),
    }
}

async fn wait_for_connection(server: &MockWsServer) {
    timeout(Duration::from_secs(2), async {
        while server.connection_count().await == 0 {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .expect("client should connect within timeout");
}

/// Block until `count` received frames contain `needle`.
async fn wait_for_frames(server: &MockWsServer, needle: &str, count: usize) {
    timeout(Duration::from_secs(2), async {
        loop {
            let messages = server.received_messages().await;
            if messages.iter().filter(|m| m.contains(needle)).count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("expected {count} frames containing {needle}"));
}

#[tokio::test]
async fn test_client_connects_and_subscribes() {
    let server = MockWsServer::start().await;
    let (message_tx, _message_rx) = mpsc::channel::<TickerPush>(100);

    let config = client_config(server.url(), &["BTC-USDT", "ETH-BTC", "ETH-USDT"]);
    let client = Arc::new(WsClient::new(config, message_tx));

    let handle = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.run().await }
    });

    wait_for_connection(&server).await;
    wait_for_frames(&server, "\"subscribe\"", 3).await;

    let messages = server.received_messages().await;
    assert!(messages
        .iter()
        .any(|m| m.contains("/market/ticker:BTC-USDT")));
    assert!(messages.iter().any(|m| m.contains("/market/ticker:ETH-BTC")));

    client.shutdown();
    handle.await.unwrap().unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_releases_each_subscription_once() {
    let server = MockWsServer::start().await;
    let (message_tx, _message_rx) = mpsc::channel::<TickerPush>(100);

    let config = client_config(server.url(), &["BTC-USDT", "ETH-BTC"]);
    let client = Arc::new(WsClient::new(config, message_tx));

    let handle = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.run().await }
    });

    wait_for_frames(&server, "\"subscribe\"", 2).await;

    client.shutdown();
    handle.await.unwrap().unwrap();
    assert_eq!(client.state(), ClientState::Stopped);

    wait_for_frames(&server, "\"unsubscribe\"", 2).await;

    // Settled: no further unsubscribes after the run has returned.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let messages = server.received_messages().await;
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("\"unsubscribe\""))
            .count(),
        2
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_pushes_flow_into_shared_quotes() {
    let server = MockWsServer::start().await;
    let (message_tx, mut message_rx) = mpsc::channel::<TickerPush>(100);

    let config = client_config(server.url(), &["BTC-USDT"]);
    let client = Arc::new(WsClient::new(config, message_tx));

    let quote = SharedQuote::new("BTC-USDT");
    let mut bindings = BindingSet::new();
    bindings.register(quote.clone());

    let ws_handle = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.run().await }
    });
    let dispatch_handle = tokio::spawn(async move {
        while let Some(push) = message_rx.recv().await {
            bindings.dispatch(&push);
        }
    });

    wait_for_connection(&server).await;
    server.push_ticker(
        "/market/ticker:BTC-USDT",
        "trade.ticker",
        json!({ "bestAsk": "50010.5", "bestBid": "50000.1" }),
    );

    timeout(Duration::from_secs(2), async {
        while !quote.is_operational() {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await
    .expect("quote should become operational from the pushed ticker");

    let snap = quote.snapshot();
    assert_eq!(snap.best_ask.to_string(), "50010.5");
    assert_eq!(snap.best_bid.to_string(), "50000.1");

    client.shutdown();
    ws_handle.await.unwrap().unwrap();
    dispatch_handle.await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn test_connect_failure_is_an_error() {
    let (message_tx, _message_rx) = mpsc::channel::<TickerPush>(10);
    let config = client_config("ws://127.0.0.1:59999".to_string(), &["BTC-USDT"]);
    let client = WsClient::new(config, message_tx);

    let result = timeout(Duration::from_secs(5), client.run()).await.unwrap();
    assert!(matches!(result, Err(WsError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_server_close_is_terminal() {
    let server = MockWsServer::start().await;
    let (message_tx, _message_rx) = mpsc::channel::<TickerPush>(100);

    let config = client_config(server.url(), &["BTC-USDT"]);
    let client = Arc::new(WsClient::new(config, message_tx));

    let handle = tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.run().await }
    });

    wait_for_connection(&server).await;
    server.shutdown().await;

    // No reconnect: the client surfaces the failure and stops.
    let result = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert!(result.is_err());
    assert_eq!(client.state(), ClientState::Stopped);
}
