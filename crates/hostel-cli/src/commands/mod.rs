//! CLI command implementations

pub mod floor;
pub mod hostel;
pub mod room;
pub mod webhook;
