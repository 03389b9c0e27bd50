//! UseCase: ルーム参加処理（JOIN → JOINED / SYNC_CODE）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加後の参加者リストが参加者本人を含む全員に同じ内容で届くこと
//! - 既存メンバーのいるルームに参加した場合、現在のドキュメントが本人にだけ届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存メンバーのいるルームへの参加
//! - 異常系：既に参加済みの接続による再参加

use std::sync::Arc;

use codesync_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, OutboundEvent, Participant, ProtocolViolation, Revision, RoomId,
    SessionStore, Timestamp, Username,
};

use super::{error::RoomProtocolError, room_lane::RoomLanes};

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Post-join roster, as broadcast in JOINED
    pub participants: Vec<Participant>,
    /// Revision sent to the joiner in SYNC_CODE, if the room had other members
    pub synced_revision: Option<Revision>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    store: Arc<dyn SessionStore>,
    message_pusher: Arc<dyn MessagePusher>,
    lanes: Arc<RoomLanes>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        lanes: Arc<RoomLanes>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            message_pusher,
            lanes,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// 1. Session Store に参加者を追加
    /// 2. 追加後の参加者リストを JOINED として参加者本人を含む全員に送信
    /// 3. 他のメンバーがいれば、ルームの現在のドキュメントを SYNC_CODE で本人にだけ送信
    ///
    /// 1〜3 はルームのレーン内で行われるため、同じルームの他のイベントと交錯しない。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        username: Username,
    ) -> Result<JoinOutcome, RoomProtocolError> {
        if let Some(current) = self.store.room_of(&connection_id).await {
            return Err(ProtocolViolation::AlreadyJoined(current).into());
        }

        let turn = self.lanes.enter(&room_id).await;

        let joined = Participant::new(
            connection_id.clone(),
            username,
            room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        if let Err(e) = self.store.add_participant(joined.clone()).await {
            // 接続 ID はゲートウェイが採番するため、ここに来るのは内部の不整合
            tracing::error!("Session Store rejected join of '{}': {}", connection_id, e);
            debug_assert!(false, "duplicate connection id reached the Session Store: {e}");
            drop(turn);
            self.lanes.prune(&room_id).await;
            return Err(e.into());
        }

        let participants = self.store.list_participants(&room_id).await;
        let targets: Vec<ConnectionId> = participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect();
        let event = OutboundEvent::Joined {
            room_id: room_id.clone(),
            clients: participants.clone(),
            joined: joined.clone(),
        };
        if let Err(e) = self.message_pusher.broadcast(&targets, &event).await {
            tracing::warn!("Failed to broadcast joined for '{}': {}", connection_id, e);
        }

        let synced_revision = if participants.len() > 1 {
            let snapshot = self.store.document(&room_id).await.unwrap_or_default();
            let revision = snapshot.revision;
            let sync = OutboundEvent::CodeSynced {
                target: connection_id.clone(),
                snapshot,
            };
            match self.message_pusher.push_to(&connection_id, &sync).await {
                Ok(()) => Some(revision),
                Err(e) => {
                    tracing::warn!("Failed to sync document to '{}': {}", connection_id, e);
                    None
                }
            }
        } else {
            None
        };

        drop(turn);

        tracing::info!(
            "'{}' ({}) joined room '{}' ({} participants)",
            joined.username,
            connection_id,
            room_id,
            participants.len()
        );

        Ok(JoinOutcome {
            participants,
            synced_revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::{ClientInfo, ServerEvent},
        usecase::test_support::{Harness, content, room, username},
    };

    fn info(id: &str, name: &str) -> ClientInfo {
        ClientInfo {
            connection_id: id.to_string(),
            username: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_participant_receives_joined_with_itself() {
        // テスト項目: 空のルームに参加すると、自分だけを含む JOINED を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_inbox) = harness.connect("A").await;

        // when (操作):
        let outcome = harness
            .join_room()
            .execute(alice, room("R1"), username("alice"))
            .await
            .unwrap();

        // then (期待する結果): SYNC_CODE は送られない
        assert_eq!(outcome.participants.len(), 1);
        assert_eq!(outcome.synced_revision, None);
        assert_eq!(
            alice_inbox.drain(),
            vec![ServerEvent::Joined {
                room_id: "R1".to_string(),
                clients: vec![info("A", "alice")],
                joined_connection_id: "A".to_string(),
                username: "alice".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_all_members_receive_identical_post_join_roster() {
        // テスト項目: 2 人目の参加で、両者が同じ（参加後の）参加者リストを受け取る
        // given (前提条件):
        let harness = Harness::new();
        let (_alice, mut alice_inbox) = harness.connect_and_join("A", "alice", "R1").await;
        alice_inbox.drain();
        let (bob, mut bob_inbox) = harness.connect("B").await;

        // when (操作):
        harness
            .join_room()
            .execute(bob, room("R1"), username("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        let expected = ServerEvent::Joined {
            room_id: "R1".to_string(),
            clients: vec![info("A", "alice"), info("B", "bob")],
            joined_connection_id: "B".to_string(),
            username: "bob".to_string(),
        };
        assert_eq!(alice_inbox.drain(), vec![expected.clone()]);
        let bob_events = bob_inbox.drain();
        assert_eq!(bob_events[0], expected);
    }

    #[tokio::test]
    async fn test_late_joiner_converges_to_current_document() {
        // テスト項目: ドキュメントのあるルームに参加すると、本人にだけ SYNC_CODE が届く
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_inbox) = harness.connect_and_join("A", "alice", "R1").await;
        harness
            .change_code()
            .execute(alice, room("R1"), content("print(1)"))
            .await
            .unwrap();
        alice_inbox.drain();
        let (bob, mut bob_inbox) = harness.connect("B").await;

        // when (操作):
        let outcome = harness
            .join_room()
            .execute(bob, room("R1"), username("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.synced_revision, Some(Revision::new(1)));
        let bob_events = bob_inbox.drain();
        assert_eq!(bob_events.len(), 2);
        assert!(matches!(bob_events[0], ServerEvent::Joined { .. }));
        assert_eq!(
            bob_events[1],
            ServerEvent::SyncCode {
                content: "print(1)".to_string(),
                revision: 1,
                target_connection_id: "B".to_string(),
            }
        );
        // alice には JOINED のみ
        let alice_events = alice_inbox.drain();
        assert_eq!(alice_events.len(), 1);
        assert!(matches!(alice_events[0], ServerEvent::Joined { .. }));
    }

    #[tokio::test]
    async fn test_second_join_from_same_connection_is_rejected() {
        // テスト項目: 参加済みの接続が再度 JOIN するとエラーになり、参加者は重複しない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_inbox) = harness.connect_and_join("A", "alice", "R1").await;
        alice_inbox.drain();

        // when (操作):
        let result = harness
            .join_room()
            .execute(alice, room("R2"), username("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomProtocolError::Violation(
                ProtocolViolation::AlreadyJoined(room("R1"))
            ))
        );
        assert_eq!(harness.store.list_participants(&room("R1")).await.len(), 1);
        assert!(harness.store.list_participants(&room("R2")).await.is_empty());
        assert!(alice_inbox.drain().is_empty());
    }

    #[tokio::test]
    async fn test_joined_at_comes_from_clock() {
        // テスト項目: 参加時刻は注入された Clock から取得される
        // given (前提条件):
        let harness = Harness::new();

        // when (操作):
        harness.connect_and_join("A", "alice", "R1").await;

        // then (期待する結果):
        let participants = harness.store.list_participants(&room("R1")).await;
        assert_eq!(
            participants[0].joined_at,
            Timestamp::new(crate::usecase::test_support::NOW)
        );
    }
}
