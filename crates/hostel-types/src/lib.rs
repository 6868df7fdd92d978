//! Hostel Types - Core types for hostel occupancy management
//!
//! These types are shared by the layout registry, the occupancy service and
//! the command-line client.
//!
//! ## Key Concepts
//!
//! - **FloorLayout**: Static geometry of one floor (rooms, amenities, labels)
//! - **RoomState**: Dynamic occupancy record for one room
//! - **Occupant**: A student assigned to a room
//! - **RenderNode**: A layout node merged with its resolved room
//! - **SheetRowPayload**: A form submission delivered through the webhook
//!
//! All JSON shapes use camelCase field names except the webhook payload,
//! which mirrors the snake_case columns of the upstream form sheet.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod events;
pub mod facility;
pub mod ids;
pub mod layout;
pub mod occupancy;
pub mod render;
pub mod webhook;

// Re-export main types
pub use error::ValidationError;
pub use events::{HistoryEntry, OccupancyChange, OccupancyEvent};
pub use facility::{FacilityKind, FacilityMeta};
pub use ids::{FacilityId, RoomId, StudentId};
pub use layout::{FloorLayout, Frame, LayoutNode, NodeKind};
pub use occupancy::{
    Occupant, Room, RoomState, RoomStatus, StudentAssignment, DEFAULT_ROOM_CAPACITY,
};
pub use render::RenderNode;
pub use webhook::{SheetAction, SheetRowPayload, SIGNATURE_HEADER};
