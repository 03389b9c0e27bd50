//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`:
//!
//! ```json
//! {"type":"join","room_id":"R1","username":"alice"}
//! {"type":"joined","room_id":"R1","clients":[{"connection_id":"…","username":"alice"}],"joined_connection_id":"…","username":"alice"}
//! ```

use serde::{Deserialize, Serialize};

/// Events sent by a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    Join {
        room_id: String,
        username: String,
    },
    CodeChange {
        room_id: String,
        content: String,
    },
    SyncCode {
        content: String,
        target_connection_id: String,
    },
    Leave {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
    RunCode {
        language_id: u32,
        source_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stdin: Option<String>,
    },
}

/// Room member as listed in `joined`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub connection_id: String,
    pub username: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    Joined {
        room_id: String,
        clients: Vec<ClientInfo>,
        joined_connection_id: String,
        username: String,
    },
    CodeChange {
        room_id: String,
        content: String,
        revision: u64,
        /// Author of the change
        connection_id: String,
    },
    SyncCode {
        content: String,
        revision: u64,
        target_connection_id: String,
    },
    Disconnected {
        connection_id: String,
        username: String,
    },
    RunResult {
        #[serde(default)]
        stdout: Option<String>,
        #[serde(default)]
        stderr: Option<String>,
        #[serde(default)]
        compile_output: Option<String>,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
    Error {
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_events_parse_from_wire_format() {
        // テスト項目: クライアントからの JSON が対応するイベントにデコードされる
        // given (前提条件):
        let join = r#"{"type":"join","room_id":"R1","username":"alice"}"#;
        let leave = r#"{"type":"leave"}"#;
        let run = r#"{"type":"run-code","language_id":71,"source_code":"print(1)"}"#;

        // when (操作):
        let join: ClientEvent = serde_json::from_str(join).unwrap();
        let leave: ClientEvent = serde_json::from_str(leave).unwrap();
        let run: ClientEvent = serde_json::from_str(run).unwrap();

        // then (期待する結果):
        assert_eq!(
            join,
            ClientEvent::Join {
                room_id: "R1".to_string(),
                username: "alice".to_string(),
            }
        );
        assert_eq!(leave, ClientEvent::Leave { room_id: None });
        assert_eq!(
            run,
            ClientEvent::RunCode {
                language_id: 71,
                source_code: "print(1)".to_string(),
                stdin: None,
            }
        );
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // テスト項目: 未知の type を持つ JSON はデコードに失敗する
        // given (前提条件):
        let text = r#"{"type":"shout","content":"hi"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_uses_kebab_case_tag() {
        // テスト項目: サーバーイベントの type は kebab-case でシリアライズされる
        // given (前提条件):
        let event = ServerEvent::CodeChange {
            room_id: "R1".to_string(),
            content: "print(1)".to_string(),
            revision: 3,
            connection_id: "A".to_string(),
        };

        // when (操作):
        let value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(value["type"], "code-change");
        assert_eq!(value["revision"], 3);
        assert_eq!(value["connection_id"], "A");
    }
}
