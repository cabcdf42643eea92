//! Read-only room query handlers.
//!
//! # Examples
//!
//! List all rooms:
//! ```bash
//! curl http://localhost:8000/api/rooms
//! ```
//!
//! Inspect one room (`/api/room/lobby` is served too):
//! ```bash
//! curl http://localhost:8000/api/rooms/lobby
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use roshambo::{RegistryError, RoomSnapshot};
use serde::Serialize;

use super::{AppState, request_id::RequestId};

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// List active room IDs.
///
/// # Response
///
/// Returns `200 OK`:
/// ```json
/// {"rooms": ["lobby", "r1"]}
/// ```
pub async fn list_rooms(State(state): State<AppState>) -> Json<RoomListResponse> {
    Json(RoomListResponse {
        rooms: state.registry.list_rooms().await,
    })
}

/// Get a snapshot of one room.
///
/// # Response
///
/// Returns `200 OK` with the room's members, phase and round history:
/// ```json
/// {
///   "room_id": "lobby",
///   "game_state": "playing",
///   "players": [{"uuid": "...", "username": "alice", "choice": null, "timestamp": 1700000000}],
///   "round_results": [{"winner": "tie", "choices": {"alice": "rock", "bob": "rock"}}]
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `{"error": "Room not found"}`
/// - `500 Internal Server Error`: The room actor stopped answering
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    request_id: RequestId,
) -> Result<Json<RoomSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    match state.registry.room_state(&room_id).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e @ RegistryError::RoomNotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.client_message(),
            }),
        )),
        Err(e) => {
            tracing::error!(
                request_id = %request_id.as_str(),
                room_id = %room_id,
                "Failed to fetch room state: {}",
                e
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.client_message(),
                }),
            ))
        }
    }
}
