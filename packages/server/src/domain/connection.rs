//! Per-connection protocol state machine.
//!
//! ```text
//! Unjoined ──JOIN──▶ Joined(room) ──LEAVE / disconnect──▶ Left
//! ```
//!
//! `Left` is terminal: the gateway closes the socket right after the move. The
//! gateway owns one `ConnectionPhase` per socket and consults it before handing
//! an event to a use case, so events that make no sense in the current phase
//! never reach the Session Store. Code execution is room-independent and is not
//! gated.

use super::{error::ProtocolViolation, value_object::RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    #[default]
    Unjoined,
    Joined(RoomId),
    Left,
}

impl ConnectionPhase {
    pub fn ensure_can_join(&self) -> Result<(), ProtocolViolation> {
        match self {
            Self::Unjoined => Ok(()),
            Self::Joined(room_id) => Err(ProtocolViolation::AlreadyJoined(room_id.clone())),
            Self::Left => Err(ProtocolViolation::AlreadyLeft),
        }
    }

    pub fn ensure_joined(&self) -> Result<&RoomId, ProtocolViolation> {
        match self {
            Self::Joined(room_id) => Ok(room_id),
            Self::Unjoined => Err(ProtocolViolation::NotJoined),
            Self::Left => Err(ProtocolViolation::AlreadyLeft),
        }
    }

    /// The event must target the room this connection joined.
    pub fn ensure_in_room(&self, claimed: &RoomId) -> Result<(), ProtocolViolation> {
        let joined = self.ensure_joined()?;
        if joined != claimed {
            return Err(ProtocolViolation::RoomMismatch {
                joined: joined.clone(),
                claimed: claimed.clone(),
            });
        }
        Ok(())
    }

    pub fn mark_joined(&mut self, room_id: RoomId) {
        *self = Self::Joined(room_id);
    }

    /// Move to `Left`, returning the room that was left, if any.
    pub fn mark_left(&mut self) -> Option<RoomId> {
        match std::mem::replace(self, Self::Left) {
            Self::Joined(room_id) => Some(room_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_unjoined_connection_can_only_join() {
        // テスト項目: 未参加の接続はルームのイベントのうち JOIN のみ許可される
        // given (前提条件):
        let phase = ConnectionPhase::default();

        // when (操作):
        let join = phase.ensure_can_join();
        let code_change = phase.ensure_in_room(&room("R1"));

        // then (期待する結果):
        assert!(join.is_ok());
        assert_eq!(code_change, Err(ProtocolViolation::NotJoined));
    }

    #[test]
    fn test_joined_connection_rejects_second_join_and_other_rooms() {
        // テスト項目: 参加済みの接続は再 JOIN と別ルーム宛てのイベントを拒否する
        // given (前提条件):
        let mut phase = ConnectionPhase::Unjoined;
        phase.mark_joined(room("R1"));

        // when (操作):
        let join = phase.ensure_can_join();
        let same_room = phase.ensure_in_room(&room("R1"));
        let other_room = phase.ensure_in_room(&room("R2"));

        // then (期待する結果):
        assert_eq!(join, Err(ProtocolViolation::AlreadyJoined(room("R1"))));
        assert!(same_room.is_ok());
        assert_eq!(
            other_room,
            Err(ProtocolViolation::RoomMismatch {
                joined: room("R1"),
                claimed: room("R2"),
            })
        );
    }

    #[test]
    fn test_left_is_terminal() {
        // テスト項目: Left は終端状態で、以降のイベントは全て拒否される
        // given (前提条件):
        let mut phase = ConnectionPhase::Joined(room("R1"));

        // when (操作):
        let left_room = phase.mark_left();

        // then (期待する結果):
        assert_eq!(left_room, Some(room("R1")));
        assert_eq!(phase, ConnectionPhase::Left);
        assert_eq!(phase.ensure_can_join(), Err(ProtocolViolation::AlreadyLeft));
        assert_eq!(phase.ensure_joined(), Err(ProtocolViolation::AlreadyLeft));
        assert_eq!(phase.mark_left(), None);
    }
}
