//! Shared utilities for the CodeSync server and client.

pub mod logger;
pub mod time;
