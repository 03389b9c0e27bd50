//! Shared application state.

use std::sync::Arc;

use codesync_shared::time::Clock;

use crate::{
    domain::{ExecutionRelay, MessagePusher, SessionStore},
    usecase::{
        ChangeCodeUseCase, ConnectionUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, RoomLanes, RunCodeUseCase, SyncCodeUseCase,
    },
};

use super::config::GatewayConfig;

pub struct AppState {
    /// ConnectionUseCase（接続の登録・切断）
    pub connection_usecase: Arc<ConnectionUseCase>,
    /// JoinRoomUseCase（ルーム参加）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// ChangeCodeUseCase（コード変更の配信）
    pub change_code_usecase: Arc<ChangeCodeUseCase>,
    /// SyncCodeUseCase（メンバー間の同期）
    pub sync_code_usecase: Arc<SyncCodeUseCase>,
    /// RunCodeUseCase（コード実行の中継）
    pub run_code_usecase: Arc<RunCodeUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub gateway: GatewayConfig,
}

impl AppState {
    /// Wire every use case onto one Session Store, one MessagePusher and one set of room lanes.
    pub fn new(
        store: Arc<dyn SessionStore>,
        message_pusher: Arc<dyn MessagePusher>,
        relay: Arc<dyn ExecutionRelay>,
        clock: Arc<dyn Clock>,
        gateway: GatewayConfig,
    ) -> Self {
        let lanes = Arc::new(RoomLanes::new());

        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            store.clone(),
            message_pusher.clone(),
            lanes.clone(),
        ));
        let connection_usecase = Arc::new(ConnectionUseCase::new(
            message_pusher.clone(),
            leave_room_usecase,
        ));
        let join_room_usecase = Arc::new(JoinRoomUseCase::new(
            store.clone(),
            message_pusher.clone(),
            lanes.clone(),
            clock,
        ));
        let change_code_usecase = Arc::new(ChangeCodeUseCase::new(
            store.clone(),
            message_pusher.clone(),
            lanes.clone(),
        ));
        let sync_code_usecase = Arc::new(SyncCodeUseCase::new(
            store.clone(),
            message_pusher,
            lanes,
        ));

        Self {
            connection_usecase,
            join_room_usecase,
            change_code_usecase,
            sync_code_usecase,
            run_code_usecase: Arc::new(RunCodeUseCase::new(relay)),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(store.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(store)),
            gateway,
        }
    }
}
