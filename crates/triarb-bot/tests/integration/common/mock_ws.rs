//! Mock WebSocket feed server for integration tests.
//!
//! Speaks just enough of the public feed protocol to test clients:
//! - Sends a welcome frame on connect
//! - Acks subscribe/unsubscribe, pongs pings
//! - Records every received frame
//! - Can push ticker messages to all connected clients
//!
//! Shutting the server down drops the push channel, which closes every
//! open connection.

use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    messages: Arc<Mutex<VecDeque<String>>>,
    connections: Arc<Mutex<u32>>,
    push_tx: broadcast::Sender<String>,
}

impl MockWsServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let messages: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
        let connections: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (push_tx, _) = broadcast::channel::<String>(64);

        let messages_clone = messages.clone();
        let connections_clone = connections.clone();
        let push_tx_clone = push_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let messages = messages_clone.clone();
                        let connections = connections_clone.clone();
                        let push_rx = push_tx_clone.subscribe();
                        tokio::spawn(handle_connection(stream, messages, connections, push_rx));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            messages,
            connections,
            push_tx,
        }
    }

    /// The server's WebSocket URL.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Number of connections accepted so far.
    pub async fn connection_count(&self) -> u32 {
        *self.connections.lock().await
    }

    /// All frames received from clients, in order.
    pub async fn received_messages(&self) -> Vec<String> {
        self.messages.lock().await.iter().cloned().collect()
    }

    /// Push one ticker message to every connected client.
    pub fn push_ticker(&self, topic: &str, subject: &str, data: serde_json::Value) {
        let frame = serde_json::json!({
            "type": "message",
            "topic": topic,
            "subject": subject,
            "data": data,
        });
        let _ = self.push_tx.send(frame.to_string());
    }

    /// Shut down: stop accepting and close all open connections.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        // Dropping self drops push_tx; handlers observe the closed channel
        // and hang up.
    }
}

async fn handle_connection(
    stream: TcpStream,
    messages: Arc<Mutex<VecDeque<String>>>,
    connections: Arc<Mutex<u32>>,
    mut push_rx: broadcast::Receiver<String>,
) {
    {
        let mut count = connections.lock().await;
        *count += 1;
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {e}");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    let welcome = serde_json::json!({ "id": "mock", "type": "welcome" });
    let _ = write.send(Message::Text(welcome.to_string())).await;

    loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    {
                        let mut msgs = messages.lock().await;
                        msgs.push_back(text.clone());
                    }

                    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&text) {
                        let id = parsed.get("id").cloned().unwrap_or_default();
                        let reply = match parsed.get("type").and_then(|t| t.as_str()) {
                            Some("subscribe") | Some("unsubscribe") => {
                                Some(serde_json::json!({ "id": id, "type": "ack" }))
                            }
                            Some("ping") => {
                                Some(serde_json::json!({ "id": id, "type": "pong" }))
                            }
                            _ => None,
                        };
                        if let Some(reply) = reply {
                            let _ = write.send(Message::Text(reply.to_string())).await;
                        }
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },

            push = push_rx.recv() => match push {
                Ok(frame) => {
                    let _ = write.send(Message::Text(frame)).await;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockWsServer::start().await;
        assert!(server.url().starts_with("ws://127.0.0.1:"));
        server.shutdown().await;
    }
}
