//! Connection Gateway: one WebSocket per participant.
//!
//! The gateway assigns the connection id, decodes frames, checks each event
//! against the connection's [`ConnectionPhase`] and hands it to the matching
//! use case. Teardown (leave + unregister) runs exactly once per socket,
//! whichever way the connection ends.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ConnectionPhase, ExecutionRequest, InboundCommand, OutboundEvent},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::RoomProtocolError,
};

/// Documents are capped at 1 MiB; leave room for JSON escaping.
const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.max_message_size(MAX_MESSAGE_BYTES)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued events to the WebSocket and pings the peer.
///
/// Events for this connection are queued by the MessagePusher (from any task)
/// and written here in queue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    heartbeat_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        heartbeat.reset(); // skip immediate first tick

        loop {
            tokio::select! {
                maybe_msg = rx.recv() => {
                    let Some(msg) = maybe_msg else {
                        break;
                    };
                    if sender.send(Message::Text(msg.into())).await.is_err() {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Whether the reader keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connection_usecase.open(tx).await;
    let mut send_task = pusher_loop(rx, sender, state.gateway.heartbeat_interval);

    let mut connection = Connection {
        state: state.clone(),
        connection_id: connection_id.clone(),
        phase: ConnectionPhase::default(),
    };
    let idle_timeout = state.gateway.idle_timeout;

    // 受信した 1 イベントの処理はループ本体で行うため、途中でキャンセルされない
    loop {
        tokio::select! {
            _ = &mut send_task => {
                tracing::debug!("Writer for '{}' ended", connection_id);
                break;
            }
            next = tokio::time::timeout(idle_timeout, receiver.next()) => {
                let msg = match next {
                    Err(_) => {
                        tracing::info!(
                            "No frame from '{}' for {:?}, closing",
                            connection_id,
                            idle_timeout
                        );
                        break;
                    }
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                        break;
                    }
                    Ok(Some(Ok(msg))) => msg,
                };

                let flow = match msg {
                    Message::Text(text) => connection.handle_text(text.as_str()).await,
                    Message::Binary(_) => {
                        connection
                            .reject("binary frames are not supported".to_string())
                            .await;
                        Flow::Continue
                    }
                    Message::Close(_) => {
                        tracing::info!("Client '{}' requested close", connection_id);
                        Flow::Close
                    }
                    // Pong はアイドルタイマーをリセットするだけ。Ping への応答は axum が行う
                    Message::Ping(_) | Message::Pong(_) => Flow::Continue,
                };
                if flow == Flow::Close {
                    break;
                }
            }
        }
    }

    send_task.abort();
    state.connection_usecase.close(&connection_id).await;
}

/// Per-socket dispatcher.
struct Connection {
    state: Arc<AppState>,
    connection_id: ConnectionId,
    phase: ConnectionPhase,
}

impl Connection {
    async fn handle_text(&mut self, text: &str) -> Flow {
        tracing::debug!("Received {} bytes from '{}'", text.len(), self.connection_id);

        let event = match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Undecodable frame from '{}': {}", self.connection_id, e);
                self.reject(format!("invalid message: {e}")).await;
                return Flow::Continue;
            }
        };

        let command = match InboundCommand::try_from(event) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Invalid event from '{}': {}", self.connection_id, e);
                self.reject(e.to_string()).await;
                return Flow::Continue;
            }
        };

        match self.dispatch(command).await {
            Ok(flow) => flow,
            Err(e) => {
                tracing::warn!("Protocol violation by '{}': {}", self.connection_id, e);
                self.reject(e.to_string()).await;
                Flow::Continue
            }
        }
    }

    async fn dispatch(&mut self, command: InboundCommand) -> Result<Flow, RoomProtocolError> {
        match command {
            InboundCommand::Join { room_id, username } => {
                self.phase.ensure_can_join()?;
                self.state
                    .join_room_usecase
                    .execute(self.connection_id.clone(), room_id.clone(), username)
                    .await?;
                self.phase.mark_joined(room_id);
            }
            InboundCommand::ChangeCode { room_id, content } => {
                self.phase.ensure_in_room(&room_id)?;
                self.state
                    .change_code_usecase
                    .execute(self.connection_id.clone(), room_id, content)
                    .await?;
            }
            InboundCommand::SyncCode { target, content } => {
                self.phase.ensure_joined()?;
                self.state
                    .sync_code_usecase
                    .execute(self.connection_id.clone(), target, content)
                    .await?;
            }
            InboundCommand::Leave { room_id } => {
                match &room_id {
                    Some(room_id) => self.phase.ensure_in_room(room_id)?,
                    None => {
                        self.phase.ensure_joined()?;
                    }
                }
                // DISCONNECTED はソケットの後始末（close）で一度だけ送信される
                if let Some(left) = self.phase.mark_left() {
                    tracing::info!("'{}' asked to leave room '{}'", self.connection_id, left);
                }
                return Ok(Flow::Close);
            }
            InboundCommand::RunCode(request) => self.spawn_run(request),
        }
        Ok(Flow::Continue)
    }

    /// Runs on its own task so room events keep flowing while the relay works.
    fn spawn_run(&self, request: ExecutionRequest) {
        let state = self.state.clone();
        let connection_id = self.connection_id.clone();
        tokio::spawn(async move {
            let result = state.run_code_usecase.execute(request).await;
            state
                .connection_usecase
                .notify(&connection_id, &OutboundEvent::ExecutionFinished(result))
                .await;
        });
    }

    async fn reject(&self, reason: String) {
        self.state
            .connection_usecase
            .notify(&self.connection_id, &OutboundEvent::Rejected { reason })
            .await;
    }
}
