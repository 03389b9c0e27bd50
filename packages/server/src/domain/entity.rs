//! Domain entities: participants, rooms and the document snapshot they share.

use super::{
    error::SessionStoreError,
    value_object::{ConnectionId, DocumentContent, Revision, RoomId, Timestamp, Username},
};

/// One connected user within a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub room_id: RoomId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        connection_id: ConnectionId,
        username: Username,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            username,
            room_id,
            joined_at,
        }
    }
}

/// Last document content applied to a room
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSnapshot {
    pub content: DocumentContent,
    pub revision: Revision,
}

impl DocumentSnapshot {
    pub fn new(content: DocumentContent, revision: Revision) -> Self {
        Self { content, revision }
    }
}

/// A room: the participants sharing one document.
///
/// Rooms have no explicit creation step. The Session Store creates one with
/// its first participant and drops it with its last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    /// Participants in join order
    pub participants: Vec<Participant>,
    pub document: DocumentSnapshot,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            document: DocumentSnapshot::default(),
            created_at,
        }
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.participants
            .iter()
            .any(|p| &p.connection_id == connection_id)
    }

    pub fn participant(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    /// Append a participant, keeping join order.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), SessionStoreError> {
        if self.contains(&participant.connection_id) {
            return Err(SessionStoreError::DuplicateConnection(
                participant.connection_id,
            ));
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn remove_participant(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        Some(self.participants.remove(index))
    }

    /// Replace the document and bump the revision.
    pub fn replace_document(&mut self, content: DocumentContent) -> Revision {
        let revision = self.document.revision.next();
        self.document = DocumentSnapshot::new(content, revision);
        revision
    }

    /// Connection ids of every member except `exclude`.
    pub fn other_members(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter(|p| &p.connection_id != exclude)
            .map(|p| p.connection_id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
