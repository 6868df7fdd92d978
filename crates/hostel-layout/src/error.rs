//! Layout registry error types

use hostel_types::{FacilityId, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the registry
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Facility already registered: {0}")]
    FacilityAlreadyExists(FacilityId),

    #[error("Facility code `{code}` already used by {existing}")]
    DuplicateFacilityCode { code: String, existing: FacilityId },

    #[error("Floor {floor} of {facility} already registered")]
    FloorAlreadyExists { facility: FacilityId, floor: u32 },

    #[error("Floor {floor} declared for unknown facility {facility}")]
    UndeclaredFacility { facility: FacilityId, floor: u32 },

    #[error("Invalid layout for {facility} floor {floor}: {source}")]
    InvalidLayout {
        facility: FacilityId,
        floor: u32,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid facility metadata: {0}")]
    InvalidFacility(#[from] ValidationError),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for registry construction
pub type Result<T> = std::result::Result<T, LayoutError>;

/// A registry lookup miss.
///
/// This is an expected outcome, not a failure: callers render a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutNotFound {
    #[error("Unknown facility: {0}")]
    Facility(FacilityId),

    #[error("No layout for floor {floor} of {facility}")]
    Floor { facility: FacilityId, floor: u32 },
}
