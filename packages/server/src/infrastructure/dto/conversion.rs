//! Conversion logic between DTOs and domain types.

use codesync_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    ConnectionId, DocumentContent, ExecutionRequest, ExecutionResult, InboundCommand,
    OutboundEvent, Participant, Room, RoomId, Username, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto, RunRequestDto, RunResultDto},
    websocket::{ClientEvent, ClientInfo, ServerEvent},
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientEvent> for InboundCommand {
    type Error = ValueObjectError;

    fn try_from(event: ClientEvent) -> Result<Self, Self::Error> {
        let command = match event {
            ClientEvent::Join { room_id, username } => Self::Join {
                room_id: RoomId::try_from(room_id)?,
                username: Username::try_from(username)?,
            },
            ClientEvent::CodeChange { room_id, content } => Self::ChangeCode {
                room_id: RoomId::try_from(room_id)?,
                content: DocumentContent::try_from(content)?,
            },
            ClientEvent::SyncCode {
                content,
                target_connection_id,
            } => Self::SyncCode {
                target: ConnectionId::try_from(target_connection_id)?,
                content: DocumentContent::try_from(content)?,
            },
            ClientEvent::Leave { room_id } => Self::Leave {
                room_id: room_id.map(RoomId::try_from).transpose()?,
            },
            ClientEvent::RunCode {
                language_id,
                source_code,
                stdin,
            } => Self::RunCode(ExecutionRequest {
                language_id,
                source_code,
                stdin,
            }),
        };
        Ok(command)
    }
}

impl From<RunRequestDto> for ExecutionRequest {
    fn from(dto: RunRequestDto) -> Self {
        Self {
            language_id: dto.language_id,
            source_code: dto.source_code,
            stdin: dto.stdin,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Participant> for ClientInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            connection_id: participant.connection_id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
        }
    }
}

impl From<&OutboundEvent> for ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Joined {
                room_id,
                clients,
                joined,
            } => Self::Joined {
                room_id: room_id.as_str().to_string(),
                clients: clients.iter().map(ClientInfo::from).collect(),
                joined_connection_id: joined.connection_id.as_str().to_string(),
                username: joined.username.as_str().to_string(),
            },
            OutboundEvent::CodeChanged {
                room_id,
                author,
                snapshot,
            } => Self::CodeChange {
                room_id: room_id.as_str().to_string(),
                content: snapshot.content.as_str().to_string(),
                revision: snapshot.revision.value(),
                connection_id: author.as_str().to_string(),
            },
            OutboundEvent::CodeSynced { target, snapshot } => Self::SyncCode {
                content: snapshot.content.as_str().to_string(),
                revision: snapshot.revision.value(),
                target_connection_id: target.as_str().to_string(),
            },
            OutboundEvent::Disconnected { participant } => Self::Disconnected {
                connection_id: participant.connection_id.as_str().to_string(),
                username: participant.username.as_str().to_string(),
            },
            OutboundEvent::ExecutionFinished(result) => Self::RunResult {
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
                compile_output: result.compile_output.clone(),
                status: result.status.clone(),
                error: result.error.clone(),
            },
            OutboundEvent::Rejected { reason } => Self::Error {
                reason: reason.clone(),
            },
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.username.as_str().to_string())
                .collect(),
            revision: room.document.revision.value(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| ParticipantDetailDto {
                    connection_id: p.connection_id.as_str().to_string(),
                    username: p.username.as_str().to_string(),
                    joined_at: timestamp_to_jst_rfc3339(p.joined_at.value()),
                })
                .collect(),
            revision: room.document.revision.value(),
            document_length: room.document.content.len(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<ExecutionResult> for RunResultDto {
    fn from(result: ExecutionResult) -> Self {
        Self {
            stdout: result.stdout,
            stderr: result.stderr,
            compile_output: result.compile_output,
            status: result.status,
            error: result.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentSnapshot, Revision, Timestamp};

    fn participant(id: &str, name: &str) -> Participant {
        Participant::new(
            ConnectionId::new(id.to_string()).unwrap(),
            Username::new(name.to_string()).unwrap(),
            RoomId::new("R1".to_string()).unwrap(),
            Timestamp::new(1672498800000),
        )
    }

    #[test]
    fn test_join_event_to_command() {
        // テスト項目: join イベントが検証済みのコマンドに変換される
        // given (前提条件):
        let event = ClientEvent::Join {
            room_id: "R1".to_string(),
            username: " alice ".to_string(),
        };

        // when (操作):
        let command = InboundCommand::try_from(event).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            InboundCommand::Join {
                room_id: RoomId::new("R1".to_string()).unwrap(),
                username: Username::new("alice".to_string()).unwrap(),
            }
        );
    }

    #[test]
    fn test_invalid_event_fields_are_rejected() {
        // テスト項目: 不正なフィールドを持つイベントはコマンドに変換できない
        // given (前提条件):
        let blank_name = ClientEvent::Join {
            room_id: "R1".to_string(),
            username: "   ".to_string(),
        };
        let empty_room = ClientEvent::Leave {
            room_id: Some(String::new()),
        };

        // when (操作):
        let blank_name = InboundCommand::try_from(blank_name);
        let empty_room = InboundCommand::try_from(empty_room);

        // then (期待する結果):
        assert_eq!(blank_name, Err(ValueObjectError::Empty("username")));
        assert_eq!(empty_room, Err(ValueObjectError::Empty("room_id")));
    }

    #[test]
    fn test_joined_event_to_dto() {
        // テスト項目: Joined イベントが参加者リスト付きの DTO に変換される
        // given (前提条件):
        let alice = participant("A", "alice");
        let bob = participant("B", "bob");
        let event = OutboundEvent::Joined {
            room_id: RoomId::new("R1".to_string()).unwrap(),
            clients: vec![alice, bob.clone()],
            joined: bob,
        };

        // when (操作):
        let dto = ServerEvent::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerEvent::Joined {
                room_id: "R1".to_string(),
                clients: vec![
                    ClientInfo {
                        connection_id: "A".to_string(),
                        username: "alice".to_string(),
                    },
                    ClientInfo {
                        connection_id: "B".to_string(),
                        username: "bob".to_string(),
                    },
                ],
                joined_connection_id: "B".to_string(),
                username: "bob".to_string(),
            }
        );
    }

    #[test]
    fn test_sync_event_to_dto() {
        // テスト項目: CodeSynced イベントが対象とリビジョン付きの DTO に変換される
        // given (前提条件):
        let event = OutboundEvent::CodeSynced {
            target: ConnectionId::new("B".to_string()).unwrap(),
            snapshot: DocumentSnapshot::new(
                DocumentContent::new("print(1)".to_string()).unwrap(),
                Revision::new(4),
            ),
        };

        // when (操作):
        let dto = ServerEvent::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerEvent::SyncCode {
                content: "print(1)".to_string(),
                revision: 4,
                target_connection_id: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_room_to_detail_dto() {
        // テスト項目: Room が詳細 DTO に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("R1".to_string()).unwrap(),
            Timestamp::new(1672498800000),
        );
        room.add_participant(participant("A", "alice")).unwrap();
        room.replace_document(DocumentContent::new("abc".to_string()).unwrap());

        // when (操作):
        let dto = RoomDetailDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.id, "R1");
        assert_eq!(dto.revision, 1);
        assert_eq!(dto.document_length, 3);
        assert_eq!(dto.participants[0].username, "alice");
        assert!(dto.created_at.starts_with("2023-01-01T00:00:00"));
    }
}
