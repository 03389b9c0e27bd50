//! Shared fixtures for the use case tests.

use std::sync::Arc;

use codesync_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DocumentContent, MessagePusher, RoomId, Username},
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionStore,
    },
};

use super::{ChangeCodeUseCase, JoinRoomUseCase, LeaveRoomUseCase, RoomLanes, SyncCodeUseCase};

pub const NOW: i64 = 1672498800000;

/// Real store + pusher wired the way the server wires them.
pub struct Harness {
    pub store: Arc<InMemorySessionStore>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub lanes: Arc<RoomLanes>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemorySessionStore::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
            lanes: Arc::new(RoomLanes::new()),
            clock: Arc::new(FixedClock::new(NOW)),
        }
    }

    pub fn join_room(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            self.store.clone(),
            self.pusher.clone(),
            self.lanes.clone(),
            self.clock.clone(),
        )
    }

    pub fn change_code(&self) -> ChangeCodeUseCase {
        ChangeCodeUseCase::new(self.store.clone(), self.pusher.clone(), self.lanes.clone())
    }

    pub fn sync_code(&self) -> SyncCodeUseCase {
        SyncCodeUseCase::new(self.store.clone(), self.pusher.clone(), self.lanes.clone())
    }

    pub fn leave_room(&self) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(self.store.clone(), self.pusher.clone(), self.lanes.clone())
    }

    /// Register a connection with the pusher, as the gateway does on upgrade.
    pub async fn connect(&self, id: &str) -> (ConnectionId, Inbox) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(connection_id.clone(), tx).await;
        (connection_id, Inbox(rx))
    }

    /// Connect and join in one step, discarding nothing.
    pub async fn connect_and_join(&self, id: &str, name: &str, room_id: &str) -> (ConnectionId, Inbox) {
        let (connection_id, inbox) = self.connect(id).await;
        self.join_room()
            .execute(connection_id.clone(), room(room_id), username(name))
            .await
            .unwrap();
        (connection_id, inbox)
    }
}

/// Everything pushed to one connection.
pub struct Inbox(mpsc::UnboundedReceiver<String>);

impl Inbox {
    /// Decode every queued frame.
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = self.0.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn username(name: &str) -> Username {
    Username::new(name.to_string()).unwrap()
}

pub fn content(text: &str) -> DocumentContent {
    DocumentContent::new(text.to_string()).unwrap()
}
