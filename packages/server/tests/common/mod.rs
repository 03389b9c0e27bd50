//! Test harness: a real server on an ephemeral port and raw WebSocket clients.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use codesync_server::{
    domain::{ExecutionError, ExecutionOutput, ExecutionRelay, ExecutionRequest},
    infrastructure::{
        dto::websocket::{ClientEvent, ServerEvent},
        message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionStore,
    },
    ui::{AppState, GatewayConfig, Server},
};
use codesync_shared::time::SystemClock;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(300);

/// Answers every run with the source code as stdout; language 0xBAD fails upstream.
pub struct EchoRelay;

pub const FAILING_LANGUAGE: u32 = 0xBAD;

#[async_trait]
impl ExecutionRelay for EchoRelay {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
        if request.language_id == FAILING_LANGUAGE {
            return Err(ExecutionError::Upstream {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(ExecutionOutput {
            stdout: Some(request.source_code),
            status: Some("Accepted".to_string()),
            ..ExecutionOutput::default()
        })
    }
}

pub async fn start_server() -> SocketAddr {
    start_server_with(GatewayConfig::default()).await
}

pub async fn start_server_with(gateway: GatewayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(WebSocketMessagePusher::new()),
        Arc::new(EchoRelay),
        Arc::new(SystemClock),
        gateway,
    );
    tokio::spawn(Server::new(state).serve(listener, std::future::pending()));
    addr
}

pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        Self { ws }
    }

    pub async fn send(&mut self, event: &ClientEvent) {
        let json = serde_json::to_string(event).unwrap();
        self.send_raw(&json).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Next server event, skipping control frames.
    pub async fn recv(&mut self) -> ServerEvent {
        tokio::time::timeout(RECV_TIMEOUT, self.next_event())
            .await
            .expect("timed out waiting for a server event")
            .expect("connection closed while waiting for a server event")
    }

    /// Asserts nothing arrives for a short while.
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(event)) = tokio::time::timeout(SILENCE, self.next_event()).await {
            panic!("expected no event, got {event:?}");
        }
    }

    /// True once the server has closed the connection. Pending events are discarded.
    pub async fn closed_by_server(&mut self) -> bool {
        let drained = async { while self.next_event().await.is_some() {} };
        tokio::time::timeout(RECV_TIMEOUT, drained).await.is_ok()
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }

    async fn next_event(&mut self) -> Option<ServerEvent> {
        while let Some(frame) = self.ws.next().await {
            match frame {
                Ok(Message::Text(text)) => return Some(serde_json::from_str(text.as_str()).unwrap()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
        None
    }

    /// Connect, join and return the gateway-assigned connection id.
    pub async fn join(addr: SocketAddr, room_id: &str, username: &str) -> (Self, String) {
        let mut client = Self::connect(addr).await;
        client.send(&join(room_id, username)).await;
        match client.recv().await {
            ServerEvent::Joined {
                joined_connection_id,
                ..
            } => (client, joined_connection_id),
            other => panic!("expected joined, got {other:?}"),
        }
    }
}

pub fn join(room_id: &str, username: &str) -> ClientEvent {
    ClientEvent::Join {
        room_id: room_id.to_string(),
        username: username.to_string(),
    }
}

pub fn code_change(room_id: &str, content: &str) -> ClientEvent {
    ClientEvent::CodeChange {
        room_id: room_id.to_string(),
        content: content.to_string(),
    }
}
