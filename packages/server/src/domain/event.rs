//! Inbound commands and outbound events of the room protocol.

use super::{
    entity::{DocumentSnapshot, Participant},
    execution::{ExecutionRequest, ExecutionResult},
    value_object::{ConnectionId, DocumentContent, RoomId, Username},
};

/// An event received from a participant, already validated.
///
/// The sender's connection id is not part of the command: the gateway passes
/// its own id alongside, remote input never chooses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    Join {
        room_id: RoomId,
        username: Username,
    },
    ChangeCode {
        room_id: RoomId,
        content: DocumentContent,
    },
    SyncCode {
        target: ConnectionId,
        content: DocumentContent,
    },
    Leave {
        room_id: Option<RoomId>,
    },
    RunCode(ExecutionRequest),
}

/// An event delivered to one or more participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Full post-join roster, sent to every member including the joiner.
    Joined {
        room_id: RoomId,
        clients: Vec<Participant>,
        joined: Participant,
    },
    /// Document replaced by `author`; never sent back to the author.
    CodeChanged {
        room_id: RoomId,
        author: ConnectionId,
        snapshot: DocumentSnapshot,
    },
    /// Point-to-point snapshot bringing `target` up to date.
    CodeSynced {
        target: ConnectionId,
        snapshot: DocumentSnapshot,
    },
    Disconnected {
        participant: Participant,
    },
    ExecutionFinished(ExecutionResult),
    Rejected {
        reason: String,
    },
}
