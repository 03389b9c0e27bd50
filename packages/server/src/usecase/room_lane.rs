//! Per-room FIFO lanes.
//!
//! Every room-scoped mutation and the broadcast it triggers run while holding
//! the room's lane, so all members observe a room's events in the order they
//! were generated. Tokio's `Mutex` grants the lock in request order, which
//! makes each lane a queue. Rooms never share a lane.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::RoomId;

/// Exclusive turn on one room's lane. Dropping it lets the next event in.
pub type LaneTurn = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct RoomLanes {
    lanes: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl RoomLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for this room's turn.
    pub async fn enter(&self, room_id: &RoomId) -> LaneTurn {
        let lane = {
            let mut lanes = self.lanes.lock().await;
            lanes.entry(room_id.clone()).or_default().clone()
        };
        lane.lock_owned().await
    }

    /// Drop the lane of a room nobody holds or waits for.
    ///
    /// Callers prune after their room became empty and their turn was dropped.
    pub async fn prune(&self, room_id: &RoomId) {
        let mut lanes = self.lanes.lock().await;
        if lanes
            .get(room_id)
            .is_some_and(|lane| Arc::strong_count(lane) == 1)
        {
            lanes.remove(room_id);
            tracing::trace!("Lane for room '{}' pruned", room_id);
        }
    }

    pub async fn lane_count(&self) -> usize {
        self.lanes.lock().await.len()
    }
}
