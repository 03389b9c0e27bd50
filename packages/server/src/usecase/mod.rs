//! UseCase layer: the Room Protocol Handler and the read-side queries.
//!
//! Room-scoped use cases (`join_room`, `change_code`, `sync_code`,
//! `leave_room`) run their Session Store mutation and the resulting broadcast
//! inside the room's lane (see [`room_lane`]).

pub mod change_code;
pub mod connection;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod room_lane;
pub mod run_code;
pub mod sync_code;

#[cfg(test)]
pub(crate) mod test_support;

pub use change_code::{ChangeCodeOutcome, ChangeCodeUseCase};
pub use connection::ConnectionUseCase;
pub use error::{GetRoomDetailError, RoomProtocolError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use room_lane::RoomLanes;
pub use run_code::RunCodeUseCase;
pub use sync_code::SyncCodeUseCase;
