//! Facility catalog handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};
use hostel_layout::FacilityEntry;
use hostel_types::{FacilityId, FacilityKind};
use serde::{Deserialize, Serialize};

/// Facility summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelSummary {
    pub id: FacilityId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityKind,
    pub floor_count: usize,
}

impl From<&FacilityEntry> for HostelSummary {
    fn from(entry: &FacilityEntry) -> Self {
        Self {
            id: entry.meta.id.clone(),
            code: entry.meta.code.clone(),
            name: entry.meta.name.clone(),
            kind: entry.meta.kind,
            floor_count: entry.floor_numbers().count(),
        }
    }
}

/// Floor summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorSummary {
    pub floor_number: u32,
    pub room_count: usize,
}

/// List all facilities
pub async fn list_hostels(State(state): State<AppState>) -> Json<Vec<HostelSummary>> {
    Json(state.registry.entries().map(HostelSummary::from).collect())
}

/// Get one facility
pub async fn get_hostel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HostelSummary>> {
    let entry = state.registry.facility(&id)?;
    Ok(Json(HostelSummary::from(entry)))
}

/// List the floors of a facility in ascending order
pub async fn list_floors(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<FloorSummary>>> {
    let entry = state.registry.facility(&id)?;
    let floors = entry
        .floors()
        .map(|(floor_number, layout)| FloorSummary {
            floor_number,
            room_count: layout.room_count(),
        })
        .collect();
    Ok(Json(floors))
}
