//! UseCase layer errors.

use thiserror::Error;

use crate::domain::{ProtocolViolation, SessionStoreError};

/// Errors of the room protocol use cases
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomProtocolError {
    #[error(transparent)]
    Violation(#[from] ProtocolViolation),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Errors of the room detail query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,

    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
}
