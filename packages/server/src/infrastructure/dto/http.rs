//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Usernames in join order
    pub participants: Vec<String>,
    pub revision: u64,
    /// RFC 3339 (JST)
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub connection_id: String,
    pub username: String,
    /// RFC 3339 (JST)
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub revision: u64,
    /// Document size in bytes
    pub document_length: usize,
    pub created_at: String,
}

/// Body of `POST /api/run`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequestDto {
    pub language_id: u32,
    pub source_code: String,
    #[serde(default)]
    pub stdin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResultDto {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}
