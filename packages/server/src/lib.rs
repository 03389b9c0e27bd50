//! CodeSync server library.
//!
//! Rooms of participants editing one shared document over WebSocket, plus a
//! relay to an external code execution service.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
