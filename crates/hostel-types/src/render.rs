//! Reconciliation output

use crate::layout::LayoutNode;
use crate::occupancy::Room;
use serde::{Deserialize, Serialize};

/// A layout node paired with its resolved room.
///
/// `room` is populated for room nodes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub layout: LayoutNode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
}

impl RenderNode {
    pub fn passthrough(layout: LayoutNode) -> Self {
        Self { layout, room: None }
    }

    pub fn with_room(layout: LayoutNode, room: Room) -> Self {
        Self {
            layout,
            room: Some(room),
        }
    }
}
