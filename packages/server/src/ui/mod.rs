//! UI layer: axum router, WebSocket gateway and HTTP API.

pub mod config;
mod handler;
mod server;
mod signal;
pub mod state;

pub use config::{GatewayConfig, ServerConfig};
pub use server::Server;
pub use state::AppState;
