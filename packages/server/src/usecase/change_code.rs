//! UseCase: コード変更の配信（CODE_CHANGE）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChangeCodeUseCase::execute() メソッド
//! - 変更が送信者以外のルームメンバーにだけ届くこと
//! - リビジョンが変更ごとに単調増加すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人のルームでの変更、1 人だけのルームでの変更
//! - 異常系：未参加の接続、参加中と異なるルームを指定した変更

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DocumentContent, DocumentSnapshot, MessagePusher, OutboundEvent,
    ProtocolViolation, Revision, RoomId, SessionStore,
};

use super::{error::RoomProtocolError, room_lane::RoomLanes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCodeOutcome {
    /// Revision assigned to the new content
    pub revision: Revision,
    /// Members the change was relayed to (never the author)
    pub recipients: Vec<ConnectionId>,
}

/// コード変更のユースケース
pub struct ChangeCodeUseCase {
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    lanes: Arc<RoomLanes>,
}

impl ChangeCodeUseCase {
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

    /// ドキュメントを置き換え、送信者以外のメンバーに CODE_CHANGE を送信
    pub async fn execute(
        &self,
        sender: ConnectionId,
        room_id: RoomId,
        content: DocumentContent,
    ) -> Result<ChangeCodeOutcome, RoomProtocolError> {
        // 送信者の所属は送信者自身のイベントでしか変わらないため、レーン外で検証できる
        match self.store.room_of(&sender).await {
            None => return Err(ProtocolViolation::NotJoined.into()),
            Some(joined) if joined != room_id => {
                return Err(ProtocolViolation::RoomMismatch {
                    joined,
                    claimed: room_id,
                }
                .into());
            }
            Some(_) => {}
        }

        let _turn = self.lanes.enter(&room_id).await;

        let revision = self
            .store
            .update_document(&room_id, content.clone())
            .await?;
        let recipients: Vec<ConnectionId> = self
            .store
            .list_participants(&room_id)
            .await
            .into_iter()
            .map(|p| p.connection_id)
            .filter(|id| id != &sender)
            .collect();

        let event = OutboundEvent::CodeChanged {
            room_id: room_id.clone(),
            author: sender.clone(),
            snapshot: DocumentSnapshot::new(content, revision),
        };
        if let Err(e) = self.message_pusher.broadcast(&recipients, &event).await {
            tracing::warn!("Failed to relay code change from '{}': {}", sender, e);
        }

        tracing::debug!(
            "Code change r{} in room '{}' from '{}' relayed to {} members",
            revision.value(),
            room_id,
            sender,
            recipients.len()
        );

        Ok(ChangeCodeOutcome {
            revision,
            recipients,
        })
    }
}
