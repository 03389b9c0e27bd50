//! Participant state: reacts to server events and terminal commands.
//!
//! No I/O happens here. Every reaction is returned as a list of [`Effect`]s
//! that the session carries out.

use codesync_server::infrastructure::dto::websocket::{ClientEvent, ClientInfo, ServerEvent};

use crate::{command::Command, document::SharedDocument, formatter::MessageFormatter};

/// Something the session must do in response to an event or a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Print(String),
    Send(ClientEvent),
    /// The server refused our JOIN
    JoinRejected(String),
    /// Send LEAVE and end the session
    Leave,
}

#[derive(Debug)]
pub struct ClientState {
    room_id: String,
    username: String,
    document: SharedDocument,
    roster: Vec<ClientInfo>,
    /// Our connection id, known once our own JOINED arrives
    me: Option<String>,
}

impl ClientState {
    pub fn new(room_id: String, username: String, initial_document: Option<String>) -> Self {
        Self {
            room_id,
            username,
            document: SharedDocument::new(initial_document.unwrap_or_default()),
            roster: Vec::new(),
            me: None,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn is_joined(&self) -> bool {
        self.me.is_some()
    }

    /// The JOIN to send on a fresh connection. Room membership from a previous
    /// connection is forgotten; the document is kept.
    pub fn begin_session(&mut self) -> ClientEvent {
        self.me = None;
        self.roster.clear();
        self.document.detach();
        ClientEvent::Join {
            room_id: self.room_id.clone(),
            username: self.username.clone(),
        }
    }

    pub fn on_server_event(&mut self, event: ServerEvent, now: i64) -> Vec<Effect> {
        match event {
            ServerEvent::Joined {
                clients,
                joined_connection_id,
                username,
                ..
            } => {
                self.roster = clients;
                if self.me.is_none() {
                    // 自分の JOIN より前に他人の JOINED が届くことはない
                    self.me = Some(joined_connection_id.clone());
                    let mut effects = vec![Effect::Print(MessageFormatter::format_roster(
                        &self.room_id,
                        &self.roster,
                        &joined_connection_id,
                    ))];
                    if self.roster.len() == 1 && !self.document.is_empty() {
                        effects.push(Effect::Send(self.code_change()));
                        effects.push(Effect::Print(MessageFormatter::format_published(
                            self.document.content().len(),
                        )));
                    }
                    effects
                } else {
                    vec![Effect::Print(MessageFormatter::format_participant_joined(
                        &username, now,
                    ))]
                }
            }
            ServerEvent::CodeChange {
                content,
                revision,
                connection_id,
                ..
            } => {
                if !self.document.apply_remote(content, revision) {
                    tracing::debug!("Dropped stale code change r{}", revision);
                    return Vec::new();
                }
                let author = self.username_of(&connection_id).to_string();
                vec![Effect::Print(MessageFormatter::format_code_change(
                    &author,
                    revision,
                    self.document.line_count(),
                    now,
                ))]
            }
            ServerEvent::SyncCode {
                content,
                revision,
                target_connection_id,
            } => {
                if self.me.as_deref() != Some(target_connection_id.as_str()) {
                    tracing::debug!("Ignored sync addressed to '{}'", target_connection_id);
                    return Vec::new();
                }
                if !self.document.apply_remote(content, revision) {
                    tracing::debug!("Dropped stale sync r{}", revision);
                    return Vec::new();
                }
                vec![Effect::Print(MessageFormatter::format_synced(
                    revision,
                    self.document.line_count(),
                ))]
            }
            ServerEvent::Disconnected {
                connection_id,
                username,
            } => {
                self.roster.retain(|c| c.connection_id != connection_id);
                vec![Effect::Print(MessageFormatter::format_participant_left(
                    &username, now,
                ))]
            }
            ServerEvent::RunResult {
                stdout,
                stderr,
                compile_output,
                status,
                error,
            } => vec![Effect::Print(MessageFormatter::format_run_result(
                status.as_deref(),
                stdout.as_deref(),
                stderr.as_deref(),
                compile_output.as_deref(),
                error.as_deref(),
            ))],
            ServerEvent::Error { reason } => {
                if self.is_joined() {
                    vec![Effect::Print(MessageFormatter::format_error(&reason))]
                } else {
                    vec![Effect::JoinRejected(reason)]
                }
            }
        }
    }

    pub fn on_command(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::Append(line) => {
                self.document.append_line(&line);
                self.publish()
            }
            Command::Clear => {
                self.document.clear();
                self.publish()
            }
            Command::Show => vec![Effect::Print(MessageFormatter::format_document(
                &self.document,
            ))],
            Command::Run { language_id } => {
                if self.document.is_empty() {
                    return vec![Effect::Print(MessageFormatter::format_notice(
                        "nothing to run: the document is empty",
                    ))];
                }
                vec![
                    Effect::Send(ClientEvent::RunCode {
                        language_id,
                        source_code: self.document.content().to_string(),
                        stdin: None,
                    }),
                    Effect::Print(MessageFormatter::format_notice("running...")),
                ]
            }
            Command::Leave => vec![Effect::Leave],
            Command::Help => vec![Effect::Print(MessageFormatter::format_help())],
            Command::Invalid(reason) => vec![Effect::Print(MessageFormatter::format_notice(
                &format!("{} (type :help)", reason),
            ))],
        }
    }

    /// LEAVE for the room we are in.
    pub fn leave_event(&self) -> ClientEvent {
        ClientEvent::Leave {
            room_id: Some(self.room_id.clone()),
        }
    }

    fn publish(&self) -> Vec<Effect> {
        if !self.is_joined() {
            return vec![Effect::Print(MessageFormatter::format_notice(
                "not in the room yet, edit kept locally",
            ))];
        }
        vec![Effect::Send(self.code_change())]
    }

    fn code_change(&self) -> ClientEvent {
        ClientEvent::CodeChange {
            room_id: self.room_id.clone(),
            content: self.document.content().to_string(),
        }
    }

    fn username_of<'a>(&'a self, connection_id: &'a str) -> &'a str {
        self.roster
            .iter()
            .find(|c| c.connection_id == connection_id)
            .map(|c| c.username.as_str())
            .unwrap_or(connection_id)
    }
}
