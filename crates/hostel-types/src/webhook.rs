//! Form-submission payload delivered by the sheet webhook
//!
//! The upstream form script posts one JSON object per submission and signs
//! the raw body with HMAC-SHA256. The signature travels hex encoded in
//! [`SIGNATURE_HEADER`].

use crate::error::ValidationError;
use crate::ids::StudentId;
use crate::occupancy::Occupant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the hex-encoded body signature
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// What a submission asks for. Only the exact lowercase values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetAction {
    Checkin,
    Checkout,
}

impl fmt::Display for SheetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetAction::Checkin => f.write_str("checkin"),
            SheetAction::Checkout => f.write_str("checkout"),
        }
    }
}

/// One form row as posted by the sheet script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRowPayload {
    /// Submission timestamp as written by the sheet
    pub timestamp: String,
    pub student_id: StudentId,
    pub student_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Facility short code, e.g. `G`
    pub hostel_code: String,
    pub floor_number: u32,
    pub room_label: String,
    pub action: SheetAction,
}

impl SheetRowPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.student_id.is_empty() {
            return Err(ValidationError::EmptyField("student_id"));
        }
        if self.student_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("student_name"));
        }
        if self.hostel_code.trim().is_empty() {
            return Err(ValidationError::EmptyField("hostel_code"));
        }
        if self.room_label.trim().is_empty() {
            return Err(ValidationError::EmptyField("room_label"));
        }
        Ok(())
    }

    /// Submission time, when the sheet wrote an RFC 3339 timestamp
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.timestamp.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Occupant record for a check-in
    pub fn to_occupant(&self) -> Occupant {
        Occupant {
            student_id: self.student_id.clone(),
            name: self.student_name.trim().to_string(),
            course: None,
            year: None,
            checked_in_at: self.submitted_at(),
            email: self.email.clone().filter(|e| !e.trim().is_empty()),
            phone: self.phone.clone().filter(|p| !p.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(action: &str) -> String {
        format!(
            r#"{{
                "timestamp": "2024-07-01T09:30:00Z",
                "student_id": "TEST001",
                "student_name": "Test Student",
                "email": "test@university.edu",
                "phone": null,
                "hostel_code": "G",
                "floor_number": 2,
                "room_label": "317",
                "action": "{}"
            }}"#,
            action
        )
    }

    #[test]
    fn test_parses_explicit_actions() {
        let payload: SheetRowPayload = serde_json::from_str(&sample_json("checkin")).unwrap();
        assert_eq!(payload.action, SheetAction::Checkin);

        let payload: SheetRowPayload = serde_json::from_str(&sample_json("checkout")).unwrap();
        assert_eq!(payload.action, SheetAction::Checkout);
    }

    #[test]
    fn test_free_text_action_is_rejected() {
        assert!(serde_json::from_str::<SheetRowPayload>(&sample_json("Check-out")).is_err());
        assert!(serde_json::from_str::<SheetRowPayload>(&sample_json("moved out")).is_err());
    }

    #[test]
    fn test_negative_floor_is_rejected() {
        let json = sample_json("checkin").replace("\"floor_number\": 2", "\"floor_number\": -1");
        assert!(serde_json::from_str::<SheetRowPayload>(&json).is_err());
    }

    #[test]
    fn test_to_occupant_carries_contact_fields() {
        let payload: SheetRowPayload = serde_json::from_str(&sample_json("checkin")).unwrap();
        let occupant = payload.to_occupant();
        assert_eq!(occupant.student_id.as_str(), "TEST001");
        assert_eq!(occupant.email.as_deref(), Some("test@university.edu"));
        assert!(occupant.phone.is_none());
        assert!(occupant.checked_in_at.is_some());
    }

    #[test]
    fn test_unparseable_timestamp_yields_none() {
        let mut payload: SheetRowPayload = serde_json::from_str(&sample_json("checkin")).unwrap();
        payload.timestamp = "7/1/2024 9:30:00".into();
        assert!(payload.submitted_at().is_none());
    }

    #[test]
    fn test_validate_blank_room_label() {
        let mut payload: SheetRowPayload = serde_json::from_str(&sample_json("checkin")).unwrap();
        payload.room_label = "  ".into();
        assert_eq!(
            payload.validate(),
            Err(ValidationError::EmptyField("room_label"))
        );
    }
}
