//! CodeSync server: rooms, live document sync and code execution over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin codesync-server
//! cargo run --bin codesync-server -- --host 0.0.0.0 --port 3000
//! CODESYNC_EXECUTION_API_KEY=... cargo run --bin codesync-server
//! ```

use std::sync::Arc;

use clap::Parser;
use codesync_server::{
    infrastructure::{
        execution::Judge0ExecutionRelay, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionStore,
    },
    ui::{AppState, Server, ServerConfig},
};
use codesync_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Session Store
    // 2. MessagePusher
    // 3. Execution Relay
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Session Store (in-memory)
    let store = Arc::new(InMemorySessionStore::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Execution Relay (Judge0)
    let relay = match Judge0ExecutionRelay::new(config.judge0()) {
        Ok(relay) => Arc::new(relay),
        Err(e) => {
            tracing::error!("Failed to set up execution relay: {}", e);
            std::process::exit(1);
        }
    };
    if config.execution_api_key.is_none() {
        tracing::info!(
            "No execution API key configured, requests to {} are sent unauthenticated",
            config.execution_url
        );
    }

    // 4. Create UseCases
    let gateway = config.gateway();
    if !gateway.is_consistent() {
        tracing::warn!(
            "Idle timeout ({:?}) does not exceed heartbeat interval ({:?}); live peers may be dropped",
            gateway.idle_timeout,
            gateway.heartbeat_interval
        );
    }
    let state = AppState::new(
        store,
        message_pusher,
        relay,
        Arc::new(SystemClock),
        gateway,
    );

    // 5. Create and run the server
    if let Err(e) = Server::new(state).run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
