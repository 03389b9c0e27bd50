//! Execution Relay boundary.
//!
//! Running code is delegated to an external service. Nothing here touches room
//! state, and a failing service only ever produces an [`ExecutionResult`] with
//! its `error` field set.

use async_trait::async_trait;
use thiserror::Error;

/// Source code to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Language/runtime identifier understood by the execution service
    pub language_id: u32,
    pub source_code: String,
    pub stdin: Option<String>,
}

/// What the execution service returned
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionOutput {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    /// Human-readable status reported by the service (e.g. "Accepted")
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("invalid execution request: {0}")]
    InvalidRequest(String),

    #[error("execution service timed out")]
    Timeout,

    #[error("execution service unreachable: {0}")]
    Http(String),

    #[error("execution service returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("unexpected execution service response: {0}")]
    Decode(String),
}

/// Result record handed back to the requesting participant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn failed(error: &ExecutionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// True when the service answered but produced no output at all.
    pub fn has_no_output(&self) -> bool {
        [&self.stdout, &self.stderr, &self.compile_output]
            .iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }
}

impl From<ExecutionOutput> for ExecutionResult {
    fn from(output: ExecutionOutput) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            compile_output: output.compile_output,
            status: output.status,
            error: None,
        }
    }
}

/// External execution service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionRelay: Send + Sync {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError>;
}
