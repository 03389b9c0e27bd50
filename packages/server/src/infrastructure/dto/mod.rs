//! Data Transfer Objects (DTOs) for the CodeSync server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: room protocol events exchanged over WebSocket
//! - `http`: HTTP API request/response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
