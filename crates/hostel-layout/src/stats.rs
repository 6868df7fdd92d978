//! Occupancy summary of a reconciled floor

use hostel_types::{RenderNode, RoomStatus};
use serde::{Deserialize, Serialize};

/// Room and bed counts for one floor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorStats {
    pub total_rooms: usize,
    pub occupied: usize,
    pub vacant: usize,
    pub reserved: usize,
    pub total_beds: usize,
    pub beds_in_use: usize,
    /// Occupied rooms as a rounded percentage of all rooms
    pub occupancy_rate: u8,
}

impl FloorStats {
    pub fn from_render_nodes(nodes: &[RenderNode]) -> Self {
        let mut stats = Self::default();

        for room in nodes.iter().filter_map(|n| n.room.as_ref()) {
            stats.total_rooms += 1;
            stats.total_beds += usize::from(room.capacity);
            stats.beds_in_use += room.occupants.len();
            match room.status {
                RoomStatus::Occupied => stats.occupied += 1,
                RoomStatus::Vacant => stats.vacant += 1,
                RoomStatus::Reserved => stats.reserved += 1,
            }
        }

        if stats.total_rooms > 0 {
            let rate = (stats.occupied as f64 / stats.total_rooms as f64 * 100.0).round();
            stats.occupancy_rate = rate as u8;
        }

        stats
    }

    pub fn free_beds(&self) -> usize {
        self.total_beds.saturating_sub(self.beds_in_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use hostel_types::{FloorLayout, Frame, LayoutNode, Occupant, RoomId, RoomState};

    fn layout() -> FloorLayout {
        FloorLayout::new(
            Frame {
                width: 400.0,
                height: 200.0,
            },
            vec![
                LayoutNode::room("101", 0.0, 0.0, 60.0, 60.0),
                LayoutNode::room("102", 65.0, 0.0, 60.0, 60.0).with_capacity(3),
                LayoutNode::room("103", 130.0, 0.0, 60.0, 60.0),
                LayoutNode::pantry("pantry", "Pantry", 200.0, 0.0, 50.0, 50.0),
            ],
        )
    }

    #[test]
    fn test_counts_and_rate() {
        let snapshot = vec![
            RoomState {
                room_id: RoomId::new("101"),
                status: RoomStatus::Occupied,
                occupants: vec![Occupant::new("S1", "X"), Occupant::new("S2", "Y")],
            },
            RoomState {
                room_id: RoomId::new("102"),
                status: RoomStatus::Reserved,
                occupants: Vec::new(),
            },
        ];
        let stats = FloorStats::from_render_nodes(&reconcile(&layout(), &snapshot));

        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.reserved, 1);
        assert_eq!(stats.vacant, 1);
        assert_eq!(stats.total_beds, 7);
        assert_eq!(stats.beds_in_use, 2);
        assert_eq!(stats.free_beds(), 5);
        assert_eq!(stats.occupancy_rate, 33);
    }

    #[test]
    fn test_floor_without_rooms() {
        let stats = FloorStats::from_render_nodes(&[]);
        assert_eq!(stats, FloorStats::default());
        assert_eq!(stats.occupancy_rate, 0);
    }
}
