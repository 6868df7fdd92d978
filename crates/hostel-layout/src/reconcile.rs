//! Layout/state reconciliation
//!
//! Merges one floor layout with one occupancy snapshot. The layout is
//! authoritative for which rooms exist: every layout node yields exactly one
//! render node, in layout order, and snapshot entries for rooms the layout
//! does not contain are dropped.
//!
//! Reconciliation is pure. It reads both inputs, allocates a fresh output,
//! and performs no I/O; duplicate and orphaned snapshot entries are reported
//! back to the caller rather than logged here.

use hostel_types::{
    FloorLayout, LayoutNode, RenderNode, Room, RoomId, RoomState, RoomStatus,
    DEFAULT_ROOM_CAPACITY,
};
use std::collections::{BTreeSet, HashMap};

/// Reconciled floor plus data-quality observations about the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One render node per layout node, in layout order
    pub nodes: Vec<RenderNode>,

    /// Room ids that appeared more than once in the snapshot; the last entry won
    pub duplicate_room_ids: Vec<RoomId>,

    /// Room ids in the snapshot with no room node on this floor
    pub orphaned_room_ids: Vec<RoomId>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.duplicate_room_ids.is_empty() && self.orphaned_room_ids.is_empty()
    }
}

/// Merge a layout with an occupancy snapshot
pub fn reconcile(layout: &FloorLayout, snapshot: &[RoomState]) -> Vec<RenderNode> {
    let index = index_snapshot(snapshot);
    layout
        .nodes
        .iter()
        .map(|node| render(node, &index))
        .collect()
}

/// Merge a layout with a snapshot and report duplicate and orphaned entries
pub fn reconcile_with_report(layout: &FloorLayout, snapshot: &[RoomState]) -> Reconciliation {
    let nodes = reconcile(layout, snapshot);

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for state in snapshot {
        if !seen.insert(state.room_id.as_str()) {
            duplicates.insert(state.room_id.as_str());
        }
    }

    let orphaned = seen
        .iter()
        .filter(|id| layout.room_node(id).is_none())
        .map(|id| RoomId::new(*id))
        .collect();

    Reconciliation {
        nodes,
        duplicate_room_ids: duplicates.into_iter().map(RoomId::new).collect(),
        orphaned_room_ids: orphaned,
    }
}

// Later entries overwrite earlier ones.
fn index_snapshot(snapshot: &[RoomState]) -> HashMap<&str, &RoomState> {
    let mut index = HashMap::with_capacity(snapshot.len());
    for state in snapshot {
        index.insert(state.room_id.as_str(), state);
    }
    index
}

fn render(node: &LayoutNode, index: &HashMap<&str, &RoomState>) -> RenderNode {
    match resolve_room(node, index.get(node.id.as_str()).copied()) {
        Some(room) => RenderNode::with_room(node.clone(), room),
        None => RenderNode::passthrough(node.clone()),
    }
}

/// Resolve one room node against its state; `None` for non-room nodes.
///
/// A missing state yields a vacant room with no occupants.
pub fn resolve_room(node: &LayoutNode, state: Option<&RoomState>) -> Option<Room> {
    if !node.kind.is_room() {
        return None;
    }

    let (status, occupants) = match state {
        Some(state) => (state.status, state.occupants.clone()),
        None => (RoomStatus::Vacant, Vec::new()),
    };

    Some(Room {
        id: RoomId::new(node.id.clone()),
        label: node.display_label().to_string(),
        capacity: node.capacity.unwrap_or(DEFAULT_ROOM_CAPACITY),
        status,
        occupants,
    })
}
