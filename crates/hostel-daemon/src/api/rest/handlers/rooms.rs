//! Room handlers: details, check-in/out, reservations and history

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{HistoryStorage, OccupancyStorage, RoomKey};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use hostel_layout::resolve_room;
use hostel_types::{
    HistoryEntry, LayoutNode, Occupant, Room, RoomId, RoomState, RoomStatus, StudentId,
    DEFAULT_ROOM_CAPACITY,
};
use serde::Deserialize;

/// Check-in request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default, alias = "branch")]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<CheckInRequest> for Occupant {
    fn from(request: CheckInRequest) -> Self {
        Occupant {
            student_id: request.student_id,
            name: request.name,
            course: request.course,
            year: request.year,
            checked_in_at: None,
            email: request.email,
            phone: request.phone,
        }
    }
}

/// Status change request body
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: RoomStatus,
}

/// History query params
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// A room address resolved against the layout registry
pub(crate) struct ResolvedRoom {
    pub key: RoomKey,
    pub node: LayoutNode,
}

impl ResolvedRoom {
    pub fn capacity(&self) -> u8 {
        self.node.capacity.unwrap_or(DEFAULT_ROOM_CAPACITY)
    }
}

/// Resolve a room node; rooms missing from the layout do not exist.
pub(crate) fn resolve(state: &AppState, facility: &str, floor: u32, room: &str) -> ApiResult<ResolvedRoom> {
    let entry = state.registry.facility(facility)?;
    let node = state
        .registry
        .room_node(facility, floor, room)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Room {} on floor {} of {}", room, floor, entry.meta.id))
        })?;

    Ok(ResolvedRoom {
        key: RoomKey::new(entry.meta.id.clone(), floor, RoomId::new(node.id.clone())),
        node: node.clone(),
    })
}

fn to_room(node: &LayoutNode, state: Option<&RoomState>) -> ApiResult<Room> {
    resolve_room(node, state)
        .ok_or_else(|| ApiError::Internal(format!("Node {} is not a room", node.id)))
}

/// Get a room with its occupants
pub async fn get_room(
    State(state): State<AppState>,
    Path((id, floor, room)): Path<(String, u32, String)>,
) -> ApiResult<Json<Room>> {
    let resolved = resolve(&state, &id, floor, &room)?;
    let room_state = state.storage.room_state(&resolved.key).await?;
    Ok(Json(to_room(&resolved.node, room_state.as_ref())?))
}

/// Check a student in
pub async fn check_in(
    State(state): State<AppState>,
    Path((id, floor, room)): Path<(String, u32, String)>,
    Json(request): Json<CheckInRequest>,
) -> ApiResult<(StatusCode, Json<Room>)> {
    let resolved = resolve(&state, &id, floor, &room)?;
    let occupant = Occupant::from(request);
    occupant.validate()?;

    let change = state
        .storage
        .check_in(&resolved.key, resolved.capacity(), occupant)
        .await?;
    state.publish(&resolved.key, &change, "api").await?;

    Ok((
        StatusCode::CREATED,
        Json(to_room(&resolved.node, Some(&change.state))?),
    ))
}

/// Check a student out
pub async fn check_out(
    State(state): State<AppState>,
    Path((id, floor, room, student_id)): Path<(String, u32, String, String)>,
) -> ApiResult<Json<Room>> {
    let resolved = resolve(&state, &id, floor, &room)?;
    let change = state
        .storage
        .check_out(&resolved.key, &StudentId::new(student_id))
        .await?;
    state.publish(&resolved.key, &change, "api").await?;

    Ok(Json(to_room(&resolved.node, Some(&change.state))?))
}

/// Reserve or release an empty room
pub async fn set_room_status(
    State(state): State<AppState>,
    Path((id, floor, room)): Path<(String, u32, String)>,
    Json(request): Json<SetStatusRequest>,
) -> ApiResult<Json<Room>> {
    let resolved = resolve(&state, &id, floor, &room)?;
    if request.status == RoomStatus::Occupied {
        return Err(ApiError::BadRequest(
            "occupied follows from check-ins and cannot be set directly".to_string(),
        ));
    }

    let change = state.storage.set_status(&resolved.key, request.status).await?;
    state.publish(&resolved.key, &change, "api").await?;

    Ok(Json(to_room(&resolved.node, Some(&change.state))?))
}

/// Change history of a room, oldest first
pub async fn room_history(
    State(state): State<AppState>,
    Path((id, floor, room)): Path<(String, u32, String)>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let resolved = resolve(&state, &id, floor, &room)?;
    let history = state.storage.room_history(&resolved.key, query.limit).await?;
    Ok(Json(history))
}
