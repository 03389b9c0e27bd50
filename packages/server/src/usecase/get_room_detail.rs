//! UseCase: ルーム詳細の取得（GET /api/rooms/{room_id}）

use std::sync::Arc;

use crate::domain::{Room, RoomId, SessionStore};

use super::error::GetRoomDetailError;

pub struct GetRoomDetailUseCase {
    store: Arc<dyn SessionStore>,
}

impl GetRoomDetailUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id)
            .map_err(|e| GetRoomDetailError::InvalidRoomId(e.to_string()))?;
        self.store
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, content, room};

    #[tokio::test]
    async fn test_existing_room_is_returned_with_document() {
        // テスト項目: 存在するルームの詳細が取得できる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _inbox) = harness.connect_and_join("A", "alice", "R1").await;
        harness
            .change_code()
            .execute(alice, room("R1"), content("abc"))
            .await
            .unwrap();
        let usecase = GetRoomDetailUseCase::new(harness.store.clone());

        // when (操作):
        let detail = usecase.execute("R1".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(detail.id, room("R1"));
        assert_eq!(detail.document.revision.value(), 1);
        assert_eq!(detail.document.content.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        // テスト項目: 存在しないルームは RoomNotFound
        // given (前提条件):
        let harness = Harness::new();
        let usecase = GetRoomDetailUseCase::new(harness.store.clone());

        // when (操作):
        let result = usecase.execute("nowhere".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(GetRoomDetailError::RoomNotFound));
    }

    #[tokio::test]
    async fn test_invalid_room_id_is_rejected() {
        // テスト項目: 不正なルーム ID は InvalidRoomId
        // given (前提条件):
        let harness = Harness::new();
        let usecase = GetRoomDetailUseCase::new(harness.store.clone());

        // when (操作):
        let result = usecase.execute("bad\u{7}id".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomDetailError::InvalidRoomId(_))));
    }
}
