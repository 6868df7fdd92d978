//! Occupancy change events
//!
//! Every successful check-in, check-out or status change produces one
//! [`HistoryEntry`] on the room and one [`OccupancyEvent`] on the event stream.

use crate::ids::{FacilityId, RoomId, StudentId};
use crate::occupancy::RoomStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What changed in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OccupancyChange {
    #[serde(rename = "checkin")]
    CheckedIn { student_id: StudentId, name: String },

    #[serde(rename = "checkout")]
    CheckedOut { student_id: StudentId, name: String },

    StatusChange { from: RoomStatus, to: RoomStatus },
}

impl OccupancyChange {
    pub fn kind(&self) -> &'static str {
        match self {
            OccupancyChange::CheckedIn { .. } => "checkin",
            OccupancyChange::CheckedOut { .. } => "checkout",
            OccupancyChange::StatusChange { .. } => "status_change",
        }
    }
}

/// One entry in a room's change history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub change: OccupancyChange,
}

impl HistoryEntry {
    pub fn new(change: OccupancyChange) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            change,
        }
    }
}

/// Broadcast notification that a room's occupancy changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyEvent {
    pub id: Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub facility: FacilityId,
    pub floor: u32,
    pub room_id: RoomId,
    pub change: OccupancyChange,

    /// Room status after the change
    pub status: RoomStatus,

    /// Occupant count after the change
    pub occupant_count: usize,

    /// Who triggered the change (e.g. `webhook`, `api`)
    pub actor: Option<String>,
}

impl OccupancyEvent {
    pub fn new(
        facility: FacilityId,
        floor: u32,
        room_id: RoomId,
        entry: &HistoryEntry,
        status: RoomStatus,
        occupant_count: usize,
    ) -> Self {
        Self {
            id: entry.id,
            timestamp: entry.timestamp,
            facility,
            floor,
            room_id,
            change: entry.change.clone(),
            status,
            occupant_count,
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
