//! UseCase: 接続のライフサイクル
//!
//! 接続ごとの送信チャンネルを MessagePusher に登録し、切断時には
//! 退出処理（DISCONNECTED の配信）を行ってから登録を解除する。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, OutboundEvent, PusherChannel};

use super::leave_room::{LeaveOutcome, LeaveRoomUseCase};

pub struct ConnectionUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl ConnectionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, leave_room: Arc<LeaveRoomUseCase>) -> Self {
        Self {
            message_pusher,
            leave_room,
        }
    }

    /// 新しい接続 ID を採番し、送信チャンネルを登録
    pub async fn open(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
        connection_id
    }

    /// 接続本人にだけイベントを送る（ERROR, RUN_RESULT など）
    pub async fn notify(&self, connection_id: &ConnectionId, event: &OutboundEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event).await {
            tracing::debug!("Dropped event for '{}': {}", connection_id, e);
        }
    }

    /// 切断処理。接続ごとに一度だけ呼ばれる前提だが、二度呼ばれても害はない。
    pub async fn close(&self, connection_id: &ConnectionId) -> Option<LeaveOutcome> {
        let outcome = self.leave_room.execute(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        tracing::info!("Connection '{}' closed", connection_id);
        outcome
    }
}
