//! UseCase: ルーム退出処理（LEAVE / 切断 → DISCONNECTED）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 残ったメンバー全員に DISCONNECTED がちょうど 1 回届くこと
//! - 最後のメンバーが抜けたルームが消えること
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人のルームからの退出、最後の 1 人の退出
//! - 冪等性：同じ接続の 2 回目の退出、未参加の接続の退出
//! - 並行性：同じルームへの JOIN と退出を多数のタスクから同時に実行

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, Participant, SessionStore};

use super::room_lane::RoomLanes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// The participant that left
    pub participant: Participant,
    /// Remaining members that were sent DISCONNECTED
    pub notified: Vec<ConnectionId>,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    lanes: Arc<RoomLanes>,
}

impl LeaveRoomUseCase {
    pub fn new(
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        lanes: Arc<RoomLanes>,
    ) -> Self {
        Self {
            store,
            message_pusher,
            lanes,
        }
    }

    /// 退出を実行。ルームに参加していない接続に対しては何もせず `None` を返す。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<LeaveOutcome> {
        let room_id = self.store.room_of(connection_id).await?;

        let turn = self.lanes.enter(&room_id).await;

        let participant = self.store.remove_participant(connection_id).await?;
        let notified: Vec<ConnectionId> = self
            .store
            .list_participants(&room_id)
            .await
            .into_iter()
            .map(|p| p.connection_id)
            .collect();

        if !notified.is_empty() {
            let event = OutboundEvent::Disconnected {
                participant: participant.clone(),
            };
            if let Err(e) = self.message_pusher.broadcast(&notified, &event).await {
                tracing::warn!("Failed to broadcast departure of '{}': {}", connection_id, e);
            }
        }

        drop(turn);
        if notified.is_empty() {
            self.lanes.prune(&room_id).await;
        }

        tracing::info!(
            "'{}' ({}) left room '{}' ({} remaining)",
            participant.username,
            connection_id,
            room_id,
            notified.len()
        );

        Some(LeaveOutcome {
            participant,
            notified,
        })
    }
}
