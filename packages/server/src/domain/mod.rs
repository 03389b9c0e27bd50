//! Domain layer: value objects, entities and the interfaces the use cases depend on.
//!
//! Nothing here knows about WebSocket frames, JSON or HTTP. Infrastructure
//! implements [`SessionStore`], [`MessagePusher`] and [`ExecutionRelay`].

pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod execution;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use connection::ConnectionPhase;
pub use entity::{DocumentSnapshot, Participant, Room};
pub use error::{ProtocolViolation, SessionStoreError, ValueObjectError};
pub use event::{InboundCommand, OutboundEvent};
pub use execution::{
    ExecutionError, ExecutionOutput, ExecutionRelay, ExecutionRequest, ExecutionResult,
};
#[cfg(test)]
pub use execution::MockExecutionRelay;
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::SessionStore;
pub use value_object::{ConnectionId, DocumentContent, Revision, RoomId, Timestamp, Username};
