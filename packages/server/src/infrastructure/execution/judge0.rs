//! Execution Relay backed by a Judge0-compatible HTTP API.
//!
//! One synchronous submission per run:
//! `POST {base_url}/submissions?base64_encoded=false&wait=true`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ExecutionError, ExecutionOutput, ExecutionRelay, ExecutionRequest};

/// Connection settings for the execution service
#[derive(Debug, Clone)]
pub struct Judge0Config {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Header carrying `api_key` (e.g. `X-RapidAPI-Key`)
    pub api_key_header: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SubmissionRequest<'a> {
    language_id: u32,
    source_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    #[allow(dead_code)]
    id: u32,
    description: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    compile_output: Option<String>,
    /// Judge0 puts internal errors here
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<SubmissionStatus>,
}

impl From<SubmissionResponse> for ExecutionOutput {
    fn from(response: SubmissionResponse) -> Self {
        Self {
            stdout: response.stdout,
            stderr: response.stderr.or(response.message),
            compile_output: response.compile_output,
            status: response.status.map(|s| s.description),
        }
    }
}

pub struct Judge0ExecutionRelay {
    http: reqwest::Client,
    submissions_url: String,
    config: Judge0Config,
}

impl Judge0ExecutionRelay {
    pub fn new(config: Judge0Config) -> Result<Self, ExecutionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExecutionError::Http(e.to_string()))?;
        let submissions_url = format!("{}/submissions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            submissions_url,
            config,
        })
    }
}

#[async_trait]
impl ExecutionRelay for Judge0ExecutionRelay {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
        let body = SubmissionRequest {
            language_id: request.language_id,
            source_code: &request.source_code,
            stdin: request.stdin.as_deref(),
        };

        let mut builder = self
            .http
            .post(&self.submissions_url)
            .query(&[("base64_encoded", "false"), ("wait", "true")])
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header(self.config.api_key_header.as_str(), api_key.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ExecutionError::Timeout
            } else {
                ExecutionError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExecutionError::Upstream {
                status: status.as_u16(),
                body: detail,
            });
        }

        let payload: SubmissionResponse = response
            .json()
            .await
            .map_err(|e| ExecutionError::Decode(e.to_string()))?;

        Ok(payload.into())
    }
}
