//! Session Store implementations.

pub mod inmemory;

pub use inmemory::InMemorySessionStore;
