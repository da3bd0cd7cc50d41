//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(state.queries.health())
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    Json(state.queries.list_rooms())
}

/// Create an empty room under a generated name
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<RoomSummaryDto>), StatusCode> {
    match state.create_room.execute() {
        Ok(summary) => Ok((StatusCode::CREATED, Json(summary))),
        Err(e) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.queries.room_detail(&room_name) {
        Some(detail) => Ok(Json(detail)),
        None => {
            tracing::debug!("Room '{}' not found", room_name);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
