//! In-memory storage.

pub mod session;

pub use session::InMemorySessionStore;
