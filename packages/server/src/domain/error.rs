//! Domain errors.

use thiserror::Error;

use super::value_object::{ConnectionId, RoomId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({actual} > {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{0} contains control characters")]
    ControlCharacter(&'static str),
}

/// Session Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// The connection is already registered in some room.
    #[error("connection '{0}' is already registered in a room")]
    DuplicateConnection(ConnectionId),

    #[error("room '{0}' not found")]
    RoomNotFound(RoomId),
}

/// Events that are not allowed in the connection's current phase, or that
/// reference a room the connection does not belong to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("connection has not joined a room")]
    NotJoined,

    #[error("connection already joined room '{0}'")]
    AlreadyJoined(RoomId),

    #[error("event for room '{claimed}' but connection is in room '{joined}'")]
    RoomMismatch { joined: RoomId, claimed: RoomId },

    #[error("connection '{0}' is not in the sender's room")]
    TargetNotInRoom(ConnectionId),

    #[error("connection already left its room")]
    AlreadyLeft,
}
