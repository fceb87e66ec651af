use crate::math::{Point2, TOLERANCE};

use super::node::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for a rope in the topology arena.
    pub struct RopeId;
}

/// Highlight state of a rope after the last scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RopeStatus {
    /// Not involved in any crossing.
    #[default]
    Clear,
    /// Crosses at least one non-adjacent rope.
    Crossing,
}

/// A directed rope between two nodes.
///
/// Every undirected edge of the cycle is carried by two ropes pointing in
/// opposite directions. The rope holds its node handles directly, so adjacency
/// is answered without any side table.
#[derive(Debug, Clone)]
pub struct RopeData {
    /// Node the rope starts at (the offset end).
    pub from: NodeId,
    /// Node the rope ends at.
    pub to: NodeId,
    /// Highlight state written by the scanner.
    pub status: RopeStatus,
}

impl RopeData {
    /// Creates a new rope from `from` to `to`.
    #[must_use]
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            status: RopeStatus::Clear,
        }
    }

    /// Returns whether the two ropes have any node in common.
    #[must_use]
    pub fn shares_node_with(&self, other: &RopeData) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    /// Returns the node at the opposite end from `node`, if `node` is an end
    /// of this rope.
    #[must_use]
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Rendered segment of a rope for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeEndpoints {
    /// Start point, pushed `offset_distance` along the rope from its start node.
    pub start: Point2,
    /// End point, the end node's position.
    pub end: Point2,
    /// `true` when the two nodes coincide and no offset could be applied.
    pub degenerate: bool,
}

impl RopeEndpoints {
    /// Computes the segment for a rope running from `from` to `to`.
    ///
    /// A zero-length edge has no direction; the start then falls back to the
    /// start node's position instead of producing NaN coordinates.
    #[must_use]
    pub fn compute(from: &Point2, to: &Point2, offset_distance: f64) -> Self {
        match (*to - *from).try_normalize(TOLERANCE) {
            Some(dir) => Self {
                start: *from + dir * offset_distance,
                end: *to,
                degenerate: false,
            },
            None => Self {
                start: *from,
                end: *to,
                degenerate: true,
            },
        }
    }
}
