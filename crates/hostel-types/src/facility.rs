//! Facility (hostel building) metadata

use crate::ids::FacilityId;
use serde::{Deserialize, Serialize};

/// Residents a facility houses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Boys,
    Girls,
}

/// Descriptive metadata for one facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityMeta {
    /// Stable identifier used in URLs, e.g. `hostelG`
    pub id: FacilityId,

    /// Short code used by the form sheet, e.g. `G`
    pub code: String,

    /// Display name
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FacilityKind,
}

impl FacilityMeta {
    pub fn new(
        id: impl Into<FacilityId>,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: FacilityKind,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            kind,
        }
    }

    /// Case-insensitive match against the short code
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}
