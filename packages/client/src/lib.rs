//! CodeSync terminal participant.
//!
//! Joins a room, mirrors the shared document locally and lets the user edit,
//! inspect and run it from a line prompt.

pub mod command;
pub mod document;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
pub mod state;
mod ui;

pub use runner::{ClientOptions, run_client};
pub use session::run_client_session;
