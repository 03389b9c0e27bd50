//! UseCase: ルーム一覧の取得（GET /api/rooms）

use std::sync::Arc;

use crate::domain::{Room, SessionStore};

pub struct GetRoomsUseCase {
    store: Arc<dyn SessionStore>,
}

impl GetRoomsUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.store.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Harness;

    #[tokio::test]
    async fn test_rooms_are_listed_in_id_order() {
        // テスト項目: 参加者のいるルームが ID 順に取得できる
        // given (前提条件):
        let harness = Harness::new();
        harness.connect_and_join("C", "carol", "zeta").await;
        harness.connect_and_join("A", "alice", "alpha").await;
        harness.connect_and_join("B", "bob", "alpha").await;
        let usecase = GetRoomsUseCase::new(harness.store.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(rooms[0].participants.len(), 2);
    }

    #[tokio::test]
    async fn test_no_rooms_when_nobody_joined() {
        // テスト項目: 誰も参加していなければ空のリスト
        // given (前提条件):
        let harness = Harness::new();
        let usecase = GetRoomsUseCase::new(harness.store.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }
}
