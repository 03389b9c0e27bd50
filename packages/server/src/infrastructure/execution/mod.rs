//! Execution Relay implementations.

pub mod judge0;

pub use judge0::{Judge0Config, Judge0ExecutionRelay};
