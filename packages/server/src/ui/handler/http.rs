//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{http::RoomStateDto, websocket::FileInfoDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Shared files whose backing file still exists, oldest first
pub async fn list_files(State(state): State<Arc<AppState>>) -> Json<Vec<FileInfoDto>> {
    let files = state.list_files_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(files.iter().map(FileInfoDto::from).collect())
}

/// Debug endpoint to get current room state (for testing purposes)
pub async fn debug_room_state(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    let room = state.get_room_state_usecase.execute().await;
    Json(RoomStateDto::new(room.snapshot, room.connections))
}
