//! Client execution logic with reconnection support.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{
    domain::{NextStep, ReconnectPolicy},
    error::ClientError,
    formatter::MessageFormatter,
    session::run_client_session,
    state::ClientState,
    ui::spawn_line_reader,
};

/// What the participant connects with
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    pub room_id: String,
    pub username: String,
    /// Published as the first document if the room turns out to be empty
    pub initial_document: Option<String>,
}

/// Run the terminal participant with reconnection logic
///
/// Returns an error when the join is refused or the server stays unreachable
/// for every attempt [`ReconnectPolicy`] allows.
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let prompt = format!("{}@{}> ", options.username, options.room_id);
    let state = Arc::new(Mutex::new(ClientState::new(
        options.room_id.clone(),
        options.username.clone(),
        options.initial_document,
    )));
    let mut input_rx = spawn_line_reader(prompt.clone());

    println!(
        "{}",
        MessageFormatter::format_notice(&format!(
            "You are '{}' in room '{}'. Type :help for commands. Press Ctrl+C to exit.",
            options.username, options.room_id
        ))
    );

    let policy = ReconnectPolicy::default();
    let mut attempt = 1;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            options.url,
            options.username,
            attempt,
            policy.max_attempts
        );

        let Err(e) = run_client_session(&options.url, state.clone(), &mut input_rx, &prompt).await
        else {
            // Ended by the user (`:leave` or Ctrl+C)
            tracing::info!("Client session ended normally");
            return Ok(());
        };

        match policy.after_failure(&e, attempt) {
            NextStep::Retry { attempt: next, after } => {
                tracing::warn!("Connection lost: {}", e);
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    after.as_secs(),
                    next,
                    policy.max_attempts
                );
                tokio::time::sleep(after).await;
                attempt = next;
            }
            NextStep::GiveUp => {
                if matches!(e, ClientError::ConnectionError(_)) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        policy.max_attempts
                    );
                } else {
                    tracing::error!("{}", e);
                }
                return Err(e);
            }
        }
    }
}
