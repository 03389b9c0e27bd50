//! One WebSocket connection to the server, from JOIN until it ends.

use std::{sync::Arc, time::Duration};

use codesync_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use codesync_shared::time::get_jst_timestamp;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::Command,
    error::ClientError,
    formatter::MessageFormatter,
    state::{ClientState, Effect},
    ui::print_with_prompt,
};

/// How long a LEAVE gets to reach the server before the socket is dropped.
const LEAVE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the participant left (`:leave`) or closed the input,
/// and an error when the connection was lost or the join was refused.
pub async fn run_client_session(
    url: &str,
    state: Arc<Mutex<ClientState>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to CodeSync server!");

    let (write, mut read) = ws_stream.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<Message>();
    let mut write_task = writer_loop(out_rx, write);

    let join = state.lock().await.begin_session();
    send_event(&out_tx, &join);

    // Spawn a task to handle incoming messages
    let read_state = state.clone();
    let read_out_tx = out_tx.clone();
    let read_prompt = prompt.to_string();
    let mut read_task: JoinHandle<Result<(), ClientError>> = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let event = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::debug!("Undecodable server frame: {}", e);
                            print_with_prompt(
                                &MessageFormatter::format_raw_message(text.as_str()),
                                &read_prompt,
                            );
                            continue;
                        }
                    };
                    let effects = read_state
                        .lock()
                        .await
                        .on_server_event(event, get_jst_timestamp());
                    for effect in effects {
                        match effect {
                            Effect::Print(text) => print_with_prompt(&text, &read_prompt),
                            Effect::Send(event) => send_event(&read_out_tx, &event),
                            Effect::JoinRejected(reason) => {
                                return Err(ClientError::Rejected(reason));
                            }
                            Effect::Leave => {}
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        Err(ClientError::ConnectionError("Connection lost".to_string()))
    });

    let outcome = loop {
        tokio::select! {
            read_result = &mut read_task => {
                break read_result.unwrap_or_else(|e| {
                    Err(ClientError::ConnectionError(format!("reader failed: {e}")))
                });
            }
            _ = &mut write_task => {
                break Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // 入力が閉じられた（Ctrl+C / Ctrl+D）
                    break Ok(());
                };
                let effects = state.lock().await.on_command(Command::parse(&line));
                let mut leaving = false;
                for effect in effects {
                    match effect {
                        Effect::Print(text) => print_with_prompt(&text, prompt),
                        Effect::Send(event) => send_event(&out_tx, &event),
                        Effect::Leave => leaving = true,
                        Effect::JoinRejected(_) => {}
                    }
                }
                if leaving {
                    let leave = state.lock().await.leave_event();
                    send_event(&out_tx, &leave);
                    let _ = out_tx.send(Message::Close(None));
                    if tokio::time::timeout(LEAVE_FLUSH_TIMEOUT, &mut write_task).await.is_err() {
                        tracing::warn!("Timed out sending leave");
                    }
                    break Ok(());
                }
            }
        }
    };

    read_task.abort();
    write_task.abort();
    outcome
}

/// Spawns the task that owns the WebSocket sink. A Close frame ends it.
fn writer_loop<S>(mut out_rx: mpsc::UnboundedReceiver<Message>, mut write: S) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: std::fmt::Display,
{
    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if let Err(e) = write.send(message).await {
                tracing::warn!("Failed to send message: {}", e);
                break;
            }
            if closing {
                break;
            }
        }
    })
}

fn send_event(out_tx: &mpsc::UnboundedSender<Message>, event: &ClientEvent) {
    match serde_json::to_string(event) {
        Ok(json) => {
            if out_tx.send(Message::Text(json.into())).is_err() {
                tracing::debug!("Writer gone, dropped outgoing event");
            }
        }
        Err(e) => tracing::error!("Failed to serialize event: {}", e),
    }
}
