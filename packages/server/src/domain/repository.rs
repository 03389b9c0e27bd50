//! Session Store trait 定義
//!
//! ルームと参加者のレジストリへのインターフェース。
//! UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
//!
//! 各操作は他の呼び出し元から見てアトミックでなければならない
//! （追加・削除の途中状態が観測されることはない）。

use async_trait::async_trait;

use super::{
    entity::{DocumentSnapshot, Participant, Room},
    error::SessionStoreError,
    value_object::{ConnectionId, DocumentContent, Revision, RoomId},
};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 参加者を追加（ルームが無ければ作成）
    ///
    /// 接続 ID がいずれかのルームに既に存在する場合は `DuplicateConnection`。
    async fn add_participant(&self, participant: Participant) -> Result<(), SessionStoreError>;

    /// 参加者を削除（存在しなければ何もしない）
    ///
    /// 最後の参加者が抜けたルームはドキュメントごと破棄される。
    async fn remove_participant(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// ルームの参加者を参加順で取得（ルームが無ければ空）
    async fn list_participants(&self, room_id: &RoomId) -> Vec<Participant>;

    /// 接続が所属するルームを取得
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 接続に対応する参加者を取得
    async fn participant(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// ルームのドキュメントを置き換え、新しいリビジョンを返す
    async fn update_document(
        &self,
        room_id: &RoomId,
        content: DocumentContent,
    ) -> Result<Revision, SessionStoreError>;

    /// ルームの現在のドキュメント
    async fn document(&self, room_id: &RoomId) -> Option<DocumentSnapshot>;

    /// Room エンティティを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room を ID 順で取得
    async fn list_rooms(&self) -> Vec<Room>;
}
