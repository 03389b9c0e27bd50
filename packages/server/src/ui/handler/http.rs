//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto, RunRequestDto, RunResultDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::InvalidRoomId(reason)) => {
            tracing::debug!("Rejected room lookup: {}", reason);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Run code through the Execution Relay.
///
/// Relay failures still answer 200, with `error` set in the body.
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RunRequestDto>, JsonRejection>,
) -> Result<Json<RunResultDto>, (StatusCode, Json<serde_json::Value>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected run request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": rejection.body_text()})),
        )
    })?;

    let result = state.run_code_usecase.execute(request.into()).await;
    Ok(Json(RunResultDto::from(result)))
}
