//! In-memory storage implementation

use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use hostel_types::{
    FacilityId, HistoryEntry, Occupant, OccupancyChange, OccupancyEvent, RoomState, RoomStatus,
    StudentAssignment, StudentId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const MAX_EVENTS: usize = 10_000;

#[derive(Debug, Clone)]
struct RoomRecord {
    state: RoomState,
    history: Vec<HistoryEntry>,
}

impl RoomRecord {
    fn new(key: &RoomKey) -> Self {
        Self {
            state: RoomState::vacant(key.room.clone()),
            history: Vec::new(),
        }
    }

    fn record(&mut self, change: OccupancyChange) -> HistoryEntry {
        let entry = HistoryEntry::new(change);
        self.history.push(entry.clone());
        entry
    }
}

// Rooms and the student index live under one lock so the one-assignment
// rule is checked and applied atomically.
#[derive(Debug, Default)]
struct RoomTable {
    rooms: HashMap<RoomKey, RoomRecord>,
    students: HashMap<StudentId, RoomKey>,
}

impl RoomTable {
    fn assignment(&self, student_id: &StudentId, key: &RoomKey) -> StorageResult<StudentAssignment> {
        let occupant = self
            .rooms
            .get(key)
            .and_then(|r| r.state.occupant(student_id))
            .cloned()
            .ok_or_else(|| {
                StorageError::InvalidData(format!("Student index points at {} without occupant", key))
            })?;

        Ok(StudentAssignment {
            facility: key.facility.clone(),
            floor: key.floor,
            room_id: key.room.clone(),
            occupant,
        })
    }
}

fn matches_query(occupant: &Occupant, needle: &str) -> bool {
    occupant.name.to_lowercase().contains(needle)
        || occupant.student_id.as_str().to_lowercase().contains(needle)
        || occupant
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(needle))
}

/// In-memory storage for development and testing
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    table: Arc<RwLock<RoomTable>>,
    events: Arc<RwLock<Vec<OccupancyEvent>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OccupancyStorage for InMemoryStorage {
    async fn floor_snapshot(&self, facility: &FacilityId, floor: u32) -> StorageResult<Vec<RoomState>> {
        let table = self.table.read().await;
        let mut states: Vec<_> = table
            .rooms
            .iter()
            .filter(|(key, _)| &key.facility == facility && key.floor == floor)
            .map(|(_, record)| record.state.clone())
            .collect();
        states.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        Ok(states)
    }

    async fn room_state(&self, key: &RoomKey) -> StorageResult<Option<RoomState>> {
        let table = self.table.read().await;
        Ok(table.rooms.get(key).map(|r| r.state.clone()))
    }

    async fn check_in(&self, key: &RoomKey, capacity: u8, mut occupant: Occupant) -> StorageResult<RoomChange> {
        occupant
            .validate()
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;

        let mut table = self.table.write().await;
        if let Some(current) = table.students.get(&occupant.student_id) {
            return Err(StorageError::Conflict(format!(
                "Student {} is already checked in to {}",
                occupant.student_id, current
            )));
        }

        let record = table
            .rooms
            .entry(key.clone())
            .or_insert_with(|| RoomRecord::new(key));
        if record.state.occupants.len() >= usize::from(capacity) {
            return Err(StorageError::CapacityExceeded {
                room: key.room.to_string(),
                capacity,
            });
        }

        occupant.checked_in_at.get_or_insert_with(chrono::Utc::now);
        let student_id = occupant.student_id.clone();
        let entry = record.record(OccupancyChange::CheckedIn {
            student_id: student_id.clone(),
            name: occupant.name.clone(),
        });
        record.state.occupants.push(occupant);
        record.state.settle_status();
        let state = record.state.clone();

        table.students.insert(student_id, key.clone());

        Ok(RoomChange {
            state,
            entry: Some(entry),
        })
    }

    async fn check_out(&self, key: &RoomKey, student_id: &StudentId) -> StorageResult<RoomChange> {
        let mut table = self.table.write().await;
        let not_found = || StorageError::NotFound(format!("Student {} in room {}", student_id, key));

        let record = table.rooms.get_mut(key).ok_or_else(not_found)?;
        let position = record
            .state
            .occupants
            .iter()
            .position(|o| &o.student_id == student_id)
            .ok_or_else(not_found)?;

        let occupant = record.state.occupants.remove(position);
        let entry = record.record(OccupancyChange::CheckedOut {
            student_id: occupant.student_id,
            name: occupant.name,
        });
        record.state.settle_status();
        let state = record.state.clone();

        table.students.remove(student_id);

        Ok(RoomChange {
            state,
            entry: Some(entry),
        })
    }

    async fn set_status(&self, key: &RoomKey, status: RoomStatus) -> StorageResult<RoomChange> {
        if status == RoomStatus::Occupied {
            return Err(StorageError::InvalidData(
                "occupied follows from check-ins and cannot be set directly".to_string(),
            ));
        }

        let mut table = self.table.write().await;
        let current = match table.rooms.get(key) {
            Some(record) => record.state.clone(),
            None => RoomState::vacant(key.room.clone()),
        };

        if !current.occupants.is_empty() {
            return Err(StorageError::Conflict(format!(
                "Room {} has {} occupant(s)",
                key,
                current.occupants.len()
            )));
        }

        // Untouched rooms stay untracked until something actually changes
        let from = current.status;
        if from == status {
            return Ok(RoomChange {
                state: current,
                entry: None,
            });
        }

        let record = table
            .rooms
            .entry(key.clone())
            .or_insert_with(|| RoomRecord::new(key));
        record.state.status = status;
        let entry = record.record(OccupancyChange::StatusChange { from, to: status });

        Ok(RoomChange {
            state: record.state.clone(),
            entry: Some(entry),
        })
    }

    async fn find_student(&self, student_id: &StudentId) -> StorageResult<Option<StudentAssignment>> {
        let table = self.table.read().await;
        match table.students.get(student_id) {
            Some(key) => table.assignment(student_id, key).map(Some),
            None => Ok(None),
        }
    }

    async fn list_students(
        &self,
        query: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> StorageResult<Vec<StudentAssignment>> {
        let needle = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let table = self.table.read().await;
        let mut assignments = table
            .students
            .iter()
            .map(|(student_id, key)| table.assignment(student_id, key))
            .collect::<StorageResult<Vec<_>>>()?;

        if let Some(needle) = needle {
            assignments.retain(|a| matches_query(&a.occupant, &needle));
        }
        assignments.sort_by(|a, b| {
            a.occupant
                .name
                .to_lowercase()
                .cmp(&b.occupant.name.to_lowercase())
                .then_with(|| a.occupant.student_id.cmp(&b.occupant.student_id))
        });

        Ok(assignments.into_iter().skip(offset).take(limit).collect())
    }

    async fn totals(&self) -> StorageResult<OccupancyTotals> {
        let table = self.table.read().await;
        let mut totals = OccupancyTotals {
            rooms_tracked: table.rooms.len(),
            occupants: table.students.len(),
            ..Default::default()
        };
        for record in table.rooms.values() {
            match record.state.status {
                RoomStatus::Occupied => totals.occupied_rooms += 1,
                RoomStatus::Reserved => totals.reserved_rooms += 1,
                RoomStatus::Vacant => {}
            }
        }
        Ok(totals)
    }
}

#[async_trait]
impl HistoryStorage for InMemoryStorage {
    async fn room_history(&self, key: &RoomKey, limit: usize) -> StorageResult<Vec<HistoryEntry>> {
        let table = self.table.read().await;
        Ok(table
            .rooms
            .get(key)
            .map(|r| {
                let start = r.history.len().saturating_sub(limit);
                r.history[start..].to_vec()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl EventStorage for InMemoryStorage {
    async fn store_event(&self, event: OccupancyEvent) -> StorageResult<()> {
        let mut events = self.events.write().await;
        events.push(event);

        if events.len() > MAX_EVENTS {
            events.drain(0..1000);
        }

        Ok(())
    }

    async fn get_recent_events(&self, limit: usize) -> StorageResult<Vec<OccupancyEvent>> {
        let events = self.events.read().await;
        let start = events.len().saturating_sub(limit);
        Ok(events[start..].to_vec())
    }

    async fn get_events_for_facility(
        &self,
        facility: &FacilityId,
        limit: usize,
    ) -> StorageResult<Vec<OccupancyEvent>> {
        let events = self.events.read().await;
        let filtered: Vec<_> = events
            .iter()
            .filter(|e| &e.facility == facility)
            .cloned()
            .collect();

        let start = filtered.len().saturating_sub(limit);
        Ok(filtered[start..].to_vec())
    }
}

impl Storage for InMemoryStorage {}

#[cfg(test)]
mod tests {
    use super::*;
    use hostel_types::RoomId;

    fn key(room: &str) -> RoomKey {
        RoomKey::new(FacilityId::new("hostelG"), 2, RoomId::new(room))
    }

    #[tokio::test]
    async fn test_check_in_and_out() {
        let storage = InMemoryStorage::new();

        let change = storage
            .check_in(&key("317"), 2, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();
        assert_eq!(change.state.status, RoomStatus::Occupied);
        assert!(change.state.occupants[0].checked_in_at.is_some());
        assert_eq!(change.entry.unwrap().change.kind(), "checkin");

        let change = storage
            .check_out(&key("317"), &StudentId::new("STU1"))
            .await
            .unwrap();
        assert_eq!(change.state.status, RoomStatus::Vacant);
        assert!(change.state.occupants.is_empty());

        let history = storage.room_history(&key("317"), 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].change.kind(), "checkout");
    }

    #[tokio::test]
    async fn test_capacity_enforced() {
        let storage = InMemoryStorage::new();
        storage
            .check_in(&key("317"), 1, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();

        let result = storage
            .check_in(&key("317"), 1, Occupant::new("STU2", "Bela"))
            .await;
        assert!(matches!(
            result,
            Err(StorageError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_student_holds_one_assignment() {
        let storage = InMemoryStorage::new();
        storage
            .check_in(&key("317"), 2, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();

        let result = storage
            .check_in(&key("318"), 3, Occupant::new("STU1", "Asha"))
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));

        let assignment = storage
            .find_student(&StudentId::new("STU1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assignment.room_id.as_str(), "317");
        assert_eq!(assignment.floor, 2);
    }

    #[tokio::test]
    async fn test_invalid_occupant_rejected() {
        let storage = InMemoryStorage::new();
        let result = storage
            .check_in(&key("317"), 2, Occupant::new(" ", "Nobody"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidData(_))));
        assert!(storage.room_state(&key("317")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_check_out_unknown_student() {
        let storage = InMemoryStorage::new();
        let result = storage.check_out(&key("317"), &StudentId::new("STU9")).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reserve_and_release() {
        let storage = InMemoryStorage::new();

        let change = storage
            .set_status(&key("305"), RoomStatus::Reserved)
            .await
            .unwrap();
        assert_eq!(change.state.status, RoomStatus::Reserved);
        assert!(change.entry.is_some());

        let again = storage
            .set_status(&key("305"), RoomStatus::Reserved)
            .await
            .unwrap();
        assert!(again.entry.is_none());

        storage
            .check_in(&key("305"), 2, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();
        let blocked = storage.set_status(&key("305"), RoomStatus::Vacant).await;
        assert!(matches!(blocked, Err(StorageError::Conflict(_))));

        let direct = storage.set_status(&key("306"), RoomStatus::Occupied).await;
        assert!(matches!(direct, Err(StorageError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_unchanged_status_leaves_room_untracked() {
        let storage = InMemoryStorage::new();

        let change = storage.set_status(&key("305"), RoomStatus::Vacant).await.unwrap();
        assert!(change.entry.is_none());
        assert_eq!(change.state.status, RoomStatus::Vacant);

        assert_eq!(storage.totals().await.unwrap().rooms_tracked, 0);
        assert!(storage
            .floor_snapshot(&FacilityId::new("hostelG"), 2)
            .await
            .unwrap()
            .is_empty());
        assert!(storage.room_state(&key("305")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_students_filters_and_pages() {
        let storage = InMemoryStorage::new();
        let mut meera = Occupant::new("STU3", "Meera");
        meera.email = Some("meera@university.edu".to_string());
        storage.check_in(&key("317"), 2, Occupant::new("STU2", "zara")).await.unwrap();
        storage.check_in(&key("317"), 2, Occupant::new("STU1", "Asha")).await.unwrap();
        storage.check_in(&key("318"), 2, meera).await.unwrap();

        let names = |list: Vec<StudentAssignment>| {
            list.into_iter().map(|a| a.occupant.name).collect::<Vec<_>>()
        };

        let all = storage.list_students(None, 50, 0).await.unwrap();
        assert_eq!(names(all), vec!["Asha", "Meera", "zara"]);

        let paged = storage.list_students(None, 1, 1).await.unwrap();
        assert_eq!(names(paged), vec!["Meera"]);

        let by_email = storage.list_students(Some("UNIVERSITY"), 50, 0).await.unwrap();
        assert_eq!(by_email[0].room_id.as_str(), "318");
        assert_eq!(by_email.len(), 1);

        let by_id = storage.list_students(Some(" stu2 "), 50, 0).await.unwrap();
        assert_eq!(names(by_id), vec!["zara"]);

        assert_eq!(storage.list_students(Some("   "), 50, 0).await.unwrap().len(), 3);

        storage.check_out(&key("317"), &StudentId::new("STU1")).await.unwrap();
        assert_eq!(storage.list_students(Some("asha"), 50, 0).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_floor_snapshot_is_scoped_and_sorted() {
        let storage = InMemoryStorage::new();
        storage
            .check_in(&key("318"), 3, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();
        storage
            .check_in(&key("304"), 2, Occupant::new("STU2", "Bela"))
            .await
            .unwrap();
        let other_floor = RoomKey::new(FacilityId::new("hostelG"), 1, RoomId::new("217"));
        storage
            .check_in(&other_floor, 2, Occupant::new("STU3", "Chitra"))
            .await
            .unwrap();

        let snapshot = storage
            .floor_snapshot(&FacilityId::new("hostelG"), 2)
            .await
            .unwrap();
        let ids: Vec<_> = snapshot.iter().map(|s| s.room_id.as_str()).collect();
        assert_eq!(ids, vec!["304", "318"]);

        let totals = storage.totals().await.unwrap();
        assert_eq!(totals.occupants, 3);
        assert_eq!(totals.occupied_rooms, 3);
    }

    #[tokio::test]
    async fn test_event_log() {
        let storage = InMemoryStorage::new();
        let change = storage
            .check_in(&key("317"), 2, Occupant::new("STU1", "Asha"))
            .await
            .unwrap();
        let entry = change.entry.unwrap();

        let event = OccupancyEvent::new(
            FacilityId::new("hostelG"),
            2,
            RoomId::new("317"),
            &entry,
            change.state.status,
            1,
        );
        storage.store_event(event).await.unwrap();

        assert_eq!(storage.get_recent_events(10).await.unwrap().len(), 1);
        assert!(storage
            .get_events_for_facility(&FacilityId::new("hostelA"), 10)
            .await
            .unwrap()
            .is_empty());
    }
}
