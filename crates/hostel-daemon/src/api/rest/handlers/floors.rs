//! Floor handlers: occupancy snapshot, layout and reconciled view

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::OccupancyStorage;
use axum::{
    extract::{Path, State},
    Json,
};
use hostel_layout::{reconcile_with_report, FloorStats};
use hostel_types::{FacilityId, FloorLayout, Frame, RenderNode, RoomState};
use serde::{Deserialize, Serialize};

/// Reconciled floor ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorView {
    pub facility: FacilityId,
    pub floor: u32,
    pub frame: Frame,
    pub nodes: Vec<RenderNode>,
    pub stats: FloorStats,
}

/// Occupancy snapshot of one floor.
///
/// Only rooms with recorded state are listed; consumers default the rest to
/// vacant.
pub async fn get_floor_snapshot(
    State(state): State<AppState>,
    Path((id, floor)): Path<(String, u32)>,
) -> ApiResult<Json<Vec<RoomState>>> {
    let entry = state.registry.facility(&id)?;
    state.registry.resolve(&id, floor)?;

    let snapshot = state.storage.floor_snapshot(&entry.meta.id, floor).await?;
    Ok(Json(snapshot))
}

/// Static layout of one floor
pub async fn get_floor_layout(
    State(state): State<AppState>,
    Path((id, floor)): Path<(String, u32)>,
) -> ApiResult<Json<FloorLayout>> {
    let layout = state.registry.resolve(&id, floor)?;
    Ok(Json(layout.clone()))
}

/// Layout merged with live occupancy
pub async fn get_floor_view(
    State(state): State<AppState>,
    Path((id, floor)): Path<(String, u32)>,
) -> ApiResult<Json<FloorView>> {
    let facility = state.registry.facility(&id)?.meta.id.clone();
    let layout = state.registry.resolve(&id, floor)?;
    let snapshot = state.storage.floor_snapshot(&facility, floor).await?;

    let report = reconcile_with_report(layout, &snapshot);
    if !report.duplicate_room_ids.is_empty() {
        tracing::warn!(
            facility = %facility,
            floor,
            rooms = ?report.duplicate_room_ids,
            "Duplicate room ids in occupancy snapshot; last entry used"
        );
    }
    if !report.orphaned_room_ids.is_empty() {
        tracing::warn!(
            facility = %facility,
            floor,
            rooms = ?report.orphaned_room_ids,
            "Occupancy recorded for rooms missing from layout"
        );
    }

    let stats = FloorStats::from_render_nodes(&report.nodes);
    Ok(Json(FloorView {
        facility,
        floor,
        frame: layout.frame,
        nodes: report.nodes,
        stats,
    }))
}
