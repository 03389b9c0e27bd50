//! InMemory Session Store 実装
//!
//! ドメイン層が定義する SessionStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。永続化はせず、寿命はプロセスと同じです。
//!
//! ルームと「接続 ID → ルーム ID」の索引を 1 つの Mutex で保護しているため、
//! 両者が食い違った状態を他の呼び出し元が観測することはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DocumentContent, DocumentSnapshot, Participant, Revision, Room, RoomId,
    SessionStore, SessionStoreError,
};

#[derive(Debug, Default)]
struct Registry {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
}

/// インメモリ Session Store 実装
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    registry: Mutex<Registry>,
}

impl InMemorySessionStore {
    /// 空の InMemorySessionStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn add_participant(&self, participant: Participant) -> Result<(), SessionStoreError> {
        let mut registry = self.registry.lock().await;

        if registry.memberships.contains_key(&participant.connection_id) {
            return Err(SessionStoreError::DuplicateConnection(
                participant.connection_id,
            ));
        }

        let connection_id = participant.connection_id.clone();
        let room_id = participant.room_id.clone();
        let room = registry
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), participant.joined_at));
        room.add_participant(participant)?;
        registry.memberships.insert(connection_id, room_id);

        Ok(())
    }

    async fn remove_participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let mut registry = self.registry.lock().await;

        let room_id = registry.memberships.remove(connection_id)?;
        let room = registry.rooms.get_mut(&room_id)?;
        let removed = room.remove_participant(connection_id);

        if room.is_empty() {
            registry.rooms.remove(&room_id);
            tracing::debug!("Room '{}' is empty and was dropped", room_id);
        }

        removed
    }

    async fn list_participants(&self, room_id: &RoomId) -> Vec<Participant> {
        let registry = self.registry.lock().await;
        registry
            .rooms
            .get(room_id)
            .map(|room| room.participants.clone())
            .unwrap_or_default()
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let registry = self.registry.lock().await;
        registry.memberships.get(connection_id).cloned()
    }

    async fn participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let registry = self.registry.lock().await;
        let room_id = registry.memberships.get(connection_id)?;
        registry
            .rooms
            .get(room_id)?
            .participant(connection_id)
            .cloned()
    }

    async fn update_document(
        &self,
        room_id: &RoomId,
        content: DocumentContent,
    ) -> Result<Revision, SessionStoreError> {
        let mut registry = self.registry.lock().await;
        let room = registry
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| SessionStoreError::RoomNotFound(room_id.clone()))?;
        Ok(room.replace_document(content))
    }

    async fn document(&self, room_id: &RoomId) -> Option<DocumentSnapshot> {
        let registry = self.registry.lock().await;
        registry.rooms.get(room_id).map(|room| room.document.clone())
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.rooms.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        let mut rooms: Vec<Room> = registry.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
