//! Validation errors raised at the system boundary

use thiserror::Error;

/// Errors raised when a record fails boundary validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field `{0}` cannot be empty")]
    EmptyField(&'static str),

    #[error("Duplicate node id `{0}` in floor layout")]
    DuplicateNodeId(String),

    #[error("Node `{0}` must carry a label")]
    MissingLabel(String),

    #[error("Node `{id}` has invalid geometry: {reason}")]
    InvalidGeometry { id: String, reason: String },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid capacity for room `{0}`: must be between 1 and 8")]
    InvalidCapacity(String),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
