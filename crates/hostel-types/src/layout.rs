//! Static floor geometry
//!
//! A FloorLayout is built once from configuration and shared read-only for
//! the lifetime of the process. Nodes are positioned in absolute pixel space
//! relative to the floor frame.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of a positioned element on a floor diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A bookable room; its id is the room id used for occupancy lookup
    Room,
    /// An amenity (pantry, washroom, stairs, lift, corridor)
    #[serde(alias = "amenity")]
    Pantry,
    /// A free-standing text label
    Label,
}

impl NodeKind {
    pub fn is_room(&self) -> bool {
        matches!(self, NodeKind::Room)
    }
}

/// A statically positioned element on a floor diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Unique within one floor
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    /// Display text; required for non-room nodes, defaults to `id` for rooms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Bed count override for room nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u8>,
}

impl LayoutNode {
    /// Create a room node
    pub fn room(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Room,
            x,
            y,
            width,
            height,
            rotation: None,
            label: None,
            capacity: None,
        }
    }

    /// Create an amenity node
    pub fn pantry(
        id: impl Into<String>,
        label: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Pantry,
            x,
            y,
            width,
            height,
            rotation: None,
            label: Some(label.into()),
            capacity: None,
        }
    }

    /// Create a text label node
    pub fn text(id: impl Into<String>, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Label,
            x,
            y,
            width: 80.0,
            height: 24.0,
            rotation: None,
            label: Some(label.into()),
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u8) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Label to display, falling back to the node id
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }

        let geometry = [self.x, self.y, self.width, self.height];
        if geometry.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidGeometry {
                id: self.id.clone(),
                reason: "coordinates must be finite".into(),
            });
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ValidationError::InvalidGeometry {
                id: self.id.clone(),
                reason: format!("size {}x{} must be positive", self.width, self.height),
            });
        }

        if !self.kind.is_room()
            && self.label.as_deref().map_or(true, |l| l.trim().is_empty())
        {
            return Err(ValidationError::MissingLabel(self.id.clone()));
        }

        if let Some(capacity) = self.capacity {
            if !(1..=8).contains(&capacity) {
                return Err(ValidationError::InvalidCapacity(self.id.clone()));
            }
        }

        Ok(())
    }
}

/// Overall canvas size of a floor diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

/// Immutable geometric description of one floor of one facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    pub frame: Frame,

    /// Render order; not semantically significant
    pub nodes: Vec<LayoutNode>,
}

impl FloorLayout {
    pub fn new(frame: Frame, nodes: Vec<LayoutNode>) -> Self {
        Self { frame, nodes }
    }

    /// Check the structural invariants of the layout
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.frame.width > 0.0 && self.frame.height > 0.0) {
            return Err(ValidationError::InvalidFrame(format!(
                "{}x{} must be positive",
                self.frame.width, self.frame.height
            )));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            node.validate()?;
            if !seen.insert(node.id.as_str()) {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
        }

        Ok(())
    }

    /// Iterate over room nodes in render order
    pub fn room_nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|n| n.kind.is_room())
    }

    pub fn room_count(&self) -> usize {
        self.room_nodes().count()
    }

    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a room node by id
    pub fn room_node(&self, id: &str) -> Option<&LayoutNode> {
        self.room_nodes().find(|n| n.id == id)
    }

    /// Find a room by the number written on a form: an exact id match wins,
    /// otherwise the display label is compared ignoring case.
    pub fn room_by_label(&self, label: &str) -> Option<&LayoutNode> {
        let label = label.trim();
        self.room_node(label).or_else(|| {
            self.room_nodes()
                .find(|n| n.display_label().eq_ignore_ascii_case(label))
        })
    }
}
