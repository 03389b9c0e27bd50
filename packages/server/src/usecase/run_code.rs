//! UseCase: コード実行の中継（RUN_CODE / POST /api/run）
//!
//! 実行は外部サービスに委譲する。失敗はすべて `error` 付きの
//! ExecutionResult として返し、ルームの状態には一切触れない。

use std::sync::Arc;

use crate::domain::{DocumentContent, ExecutionError, ExecutionRelay, ExecutionRequest, ExecutionResult};

pub struct RunCodeUseCase {
    relay: Arc<dyn ExecutionRelay>,
}

impl RunCodeUseCase {
    pub fn new(relay: Arc<dyn ExecutionRelay>) -> Self {
        Self { relay }
    }

    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        if let Err(e) = validate(&request) {
            tracing::debug!("Rejected execution request: {}", e);
            return ExecutionResult::failed(&e);
        }

        let language_id = request.language_id;
        match self.relay.execute(request).await {
            Ok(output) => {
                tracing::info!("Execution finished (language {})", language_id);
                output.into()
            }
            Err(e) => {
                tracing::warn!("Execution relay failed (language {}): {}", language_id, e);
                ExecutionResult::failed(&e)
            }
        }
    }
}

fn validate(request: &ExecutionRequest) -> Result<(), ExecutionError> {
    if request.language_id == 0 {
        return Err(ExecutionError::InvalidRequest(
            "language_id must be positive".to_string(),
        ));
    }
    if request.source_code.trim().is_empty() {
        return Err(ExecutionError::InvalidRequest(
            "source code is empty".to_string(),
        ));
    }
    // ドキュメントと同じ上限
    DocumentContent::new(request.source_code.clone())
        .map_err(|e| ExecutionError::InvalidRequest(e.to_string()))?;
    Ok(())
}
