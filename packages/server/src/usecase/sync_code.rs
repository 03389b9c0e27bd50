//! UseCase: メンバー間のドキュメント同期（SYNC_CODE）
//!
//! 参加者が同じルームの特定のメンバーに自分のドキュメントを送る。
//! 送られた内容は転送するだけで、ルームのドキュメントは更新しない。
//!
//! 転送される内容はサーバーのスナップショットより古い可能性があるため、
//! 常に初期リビジョン (0) を付与する。何らかのリビジョンを受け取り済みの
//! クライアントはこれを古い更新として破棄する。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DocumentContent, DocumentSnapshot, MessagePusher, OutboundEvent,
    ProtocolViolation, Revision, SessionStore,
};

use super::{error::RoomProtocolError, room_lane::RoomLanes};

pub struct SyncCodeUseCase {
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    lanes: Arc<RoomLanes>,
}

impl SyncCodeUseCase {
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

    /// `target` に SYNC_CODE を送信し、付与したリビジョン (常に 0) を返す
    pub async fn execute(
        &self,
        sender: ConnectionId,
        target: ConnectionId,
        content: DocumentContent,
    ) -> Result<Revision, RoomProtocolError> {
        let room_id = self
            .store
            .room_of(&sender)
            .await
            .ok_or(ProtocolViolation::NotJoined)?;

        let _turn = self.lanes.enter(&room_id).await;

        if self.store.room_of(&target).await.as_ref() != Some(&room_id) {
            return Err(ProtocolViolation::TargetNotInRoom(target).into());
        }

        let revision = Revision::default();
        let event = OutboundEvent::CodeSynced {
            target: target.clone(),
            snapshot: DocumentSnapshot::new(content, revision),
        };
        if let Err(e) = self.message_pusher.push_to(&target, &event).await {
            tracing::warn!("Failed to forward sync from '{}' to '{}': {}", sender, target, e);
        }

        tracing::debug!("Sync r{} forwarded from '{}' to '{}'", revision.value(), sender, target);
        Ok(revision)
    }
}
