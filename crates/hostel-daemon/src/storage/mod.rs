//! Storage layer for hostel-daemon
//!
//! Holds live room occupancy, per-room history and the recent event log.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{
    EventStorage, HistoryStorage, OccupancyStorage, OccupancyTotals, RoomChange, RoomKey,
    Storage, StorageResult,
};
