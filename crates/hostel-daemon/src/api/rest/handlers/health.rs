//! Health and status handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::OccupancyStorage;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub stats: DaemonStats,
}

/// Daemon statistics
#[derive(Debug, Serialize)]
pub struct DaemonStats {
    pub facilities: usize,
    pub floors: usize,
    pub rooms_tracked: usize,
    pub occupied_rooms: usize,
    pub reserved_rooms: usize,
    pub occupants: usize,
    pub event_subscribers: usize,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> ApiResult<Json<DaemonStatusResponse>> {
    let totals = state.storage.totals().await?;

    Ok(Json(DaemonStatusResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        stats: DaemonStats {
            facilities: state.registry.facility_count(),
            floors: state.registry.floor_count(),
            rooms_tracked: totals.rooms_tracked,
            occupied_rooms: totals.occupied_rooms,
            reserved_rooms: totals.reserved_rooms,
            occupants: totals.occupants,
            event_subscribers: state.event_tx.receiver_count(),
        },
    }))
}
