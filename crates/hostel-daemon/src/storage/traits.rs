//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use hostel_types::{
    FacilityId, HistoryEntry, Occupant, OccupancyEvent, RoomId, RoomState, RoomStatus,
    StudentAssignment, StudentId,
};
use std::fmt;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Address of one room
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    pub facility: FacilityId,
    pub floor: u32,
    pub room: RoomId,
}

impl RoomKey {
    pub fn new(facility: FacilityId, floor: u32, room: RoomId) -> Self {
        Self {
            facility,
            floor,
            room,
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.facility, self.floor, self.room)
    }
}

/// Result of a successful write to a room
#[derive(Debug, Clone)]
pub struct RoomChange {
    /// Room state after the write
    pub state: RoomState,

    /// Recorded history entry; `None` when the write changed nothing
    pub entry: Option<HistoryEntry>,
}

/// Aggregate counts across all stored rooms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccupancyTotals {
    pub rooms_tracked: usize,
    pub occupied_rooms: usize,
    pub reserved_rooms: usize,
    pub occupants: usize,
}

/// Combined storage trait
#[async_trait]
pub trait Storage: OccupancyStorage + HistoryStorage + EventStorage + Send + Sync {}

/// Live occupancy of rooms
#[async_trait]
pub trait OccupancyStorage: Send + Sync {
    /// Room states recorded for one floor, ordered by room id
    async fn floor_snapshot(&self, facility: &FacilityId, floor: u32) -> StorageResult<Vec<RoomState>>;

    /// State of one room, if anything was ever recorded for it
    async fn room_state(&self, key: &RoomKey) -> StorageResult<Option<RoomState>>;

    /// Add an occupant. Fails when the room is full or the student already
    /// holds an assignment anywhere.
    async fn check_in(&self, key: &RoomKey, capacity: u8, occupant: Occupant) -> StorageResult<RoomChange>;

    /// Remove an occupant from the room
    async fn check_out(&self, key: &RoomKey, student_id: &StudentId) -> StorageResult<RoomChange>;

    /// Reserve or release an empty room
    async fn set_status(&self, key: &RoomKey, status: RoomStatus) -> StorageResult<RoomChange>;

    /// Current assignment of a student
    async fn find_student(&self, student_id: &StudentId) -> StorageResult<Option<StudentAssignment>>;

    /// Students with an active assignment, ordered by name.
    ///
    /// `query` matches name, email or student id, case-insensitively.
    async fn list_students(
        &self,
        query: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<StudentAssignment>>;

    /// Counts across every stored room
    async fn totals(&self) -> StorageResult<OccupancyTotals>;
}

/// Per-room change history
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Most recent history entries of a room, oldest first
    async fn room_history(&self, key: &RoomKey, limit: usize) -> StorageResult<Vec<HistoryEntry>>;
}

/// Storage for occupancy events
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Store an event
    async fn store_event(&self, event: OccupancyEvent) -> StorageResult<()>;

    /// Get recent events
    async fn get_recent_events(&self, limit: usize) -> StorageResult<Vec<OccupancyEvent>>;

    /// Get recent events for one facility
    async fn get_events_for_facility(
        &self,
        facility: &FacilityId,
        limit: usize,
    ) -> StorageResult<Vec<OccupancyEvent>>;
}
