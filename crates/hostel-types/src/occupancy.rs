//! Dynamic occupancy records
//!
//! Default-value policy per field:
//! - `RoomState.occupants`: absent means no occupants
//! - `Occupant.course`, `year`, `email`, `phone`, `checkedInAt`: absent means unknown
//! - `Room.capacity`: taken from the layout node, otherwise [`DEFAULT_ROOM_CAPACITY`]

use crate::error::ValidationError;
use crate::ids::{FacilityId, RoomId, StudentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bed count assumed for a room whose layout node does not override it
pub const DEFAULT_ROOM_CAPACITY: u8 = 2;

/// Occupancy status of a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Vacant,
    Occupied,
    Reserved,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Vacant => "vacant",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student assigned to a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub student_id: StudentId,

    pub name: String,

    /// Course or program, e.g. "B.Tech CSE"
    #[serde(default, alias = "branch", skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    /// Year of study
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,

    #[serde(default, alias = "checkinDate", skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Occupant {
    pub fn new(student_id: impl Into<StudentId>, name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            course: None,
            year: None,
            checked_in_at: None,
            email: None,
            phone: None,
        }
    }

    pub fn with_course(mut self, course: impl Into<String>, year: u8) -> Self {
        self.course = Some(course.into());
        self.year = Some(year);
        self
    }

    pub fn checked_in(mut self, at: DateTime<Utc>) -> Self {
        self.checked_in_at = Some(at);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.is_empty() {
            return Err(ValidationError::EmptyField("studentId"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if let Some(year) = self.year {
            if !(1..=6).contains(&year) {
                return Err(ValidationError::InvalidValue {
                    field: "year",
                    reason: format!("{} is outside 1..=6", year),
                });
            }
        }
        Ok(())
    }
}

/// Occupancy record for one room as served by the occupancy source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    pub room_id: RoomId,

    pub status: RoomStatus,

    #[serde(default)]
    pub occupants: Vec<Occupant>,
}

impl RoomState {
    pub fn vacant(room_id: impl Into<RoomId>) -> Self {
        Self {
            room_id: room_id.into(),
            status: RoomStatus::Vacant,
            occupants: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.room_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyField("roomId"));
        }
        self.occupants.iter().try_for_each(Occupant::validate)
    }

    /// Recompute status after the occupant list changed.
    ///
    /// Any occupant makes the room occupied. An empty room becomes vacant,
    /// except that a standing reservation on an empty room is kept.
    pub fn settle_status(&mut self) {
        self.status = match (self.occupants.is_empty(), self.status) {
            (false, _) => RoomStatus::Occupied,
            (true, RoomStatus::Reserved) => RoomStatus::Reserved,
            (true, _) => RoomStatus::Vacant,
        };
    }

    pub fn occupant(&self, student_id: &StudentId) -> Option<&Occupant> {
        self.occupants.iter().find(|o| &o.student_id == student_id)
    }
}

/// A room resolved against its layout node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub label: String,
    pub capacity: u8,
    pub status: RoomStatus,
    pub occupants: Vec<Occupant>,
}

impl Room {
    pub fn free_beds(&self) -> usize {
        usize::from(self.capacity).saturating_sub(self.occupants.len())
    }

    pub fn is_full(&self) -> bool {
        self.free_beds() == 0
    }
}

/// Where a student currently lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignment {
    pub facility: FacilityId,
    pub floor: u32,
    pub room_id: RoomId,
    pub occupant: Occupant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_state_wire_shape() {
        let json = r#"{
            "roomId": "A1",
            "status": "occupied",
            "occupants": [{"studentId": "S1", "name": "X"}]
        }"#;
        let state: RoomState = serde_json::from_str(json).unwrap();
        assert_eq!(state.room_id.as_str(), "A1");
        assert_eq!(state.status, RoomStatus::Occupied);
        assert_eq!(state.occupants[0].student_id.as_str(), "S1");
        assert!(state.occupants[0].course.is_none());
    }

    #[test]
    fn test_missing_occupants_default_to_empty() {
        let state: RoomState =
            serde_json::from_str(r#"{"roomId":"101","status":"reserved"}"#).unwrap();
        assert!(state.occupants.is_empty());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_str::<RoomState>(r#"{"roomId":"101","status":"full"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_occupant_missing_name_is_rejected() {
        let result = serde_json::from_str::<Occupant>(r#"{"studentId":"S1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_occupant_accepts_legacy_field_names() {
        let json = r#"{"studentId":"S1","name":"X","branch":"MBA","checkinDate":"2024-03-01T00:00:00Z"}"#;
        let occupant: Occupant = serde_json::from_str(json).unwrap();
        assert_eq!(occupant.course.as_deref(), Some("MBA"));
        assert!(occupant.checked_in_at.is_some());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let state = RoomState {
            room_id: RoomId::new("101"),
            status: RoomStatus::Occupied,
            occupants: vec![Occupant::new("", "X")],
        };
        assert_eq!(state.validate(), Err(ValidationError::EmptyField("studentId")));

        let occupant = Occupant::new("S1", "X").with_course("MBA", 9);
        assert!(matches!(
            occupant.validate(),
            Err(ValidationError::InvalidValue { field: "year", .. })
        ));
    }

    #[test]
    fn test_settle_status() {
        let mut state = RoomState::vacant("101");
        state.occupants.push(Occupant::new("S1", "X"));
        state.settle_status();
        assert_eq!(state.status, RoomStatus::Occupied);

        state.occupants.clear();
        state.settle_status();
        assert_eq!(state.status, RoomStatus::Vacant);

        state.status = RoomStatus::Reserved;
        state.settle_status();
        assert_eq!(state.status, RoomStatus::Reserved);
    }

    #[test]
    fn test_free_beds() {
        let room = Room {
            id: RoomId::new("101"),
            label: "101".into(),
            capacity: DEFAULT_ROOM_CAPACITY,
            status: RoomStatus::Occupied,
            occupants: vec![Occupant::new("S1", "X")],
        };
        assert_eq!(room.free_beds(), 1);
        assert!(!room.is_full());
    }
}
