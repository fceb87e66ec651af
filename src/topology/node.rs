use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a node in the topology arena.
    pub struct NodeId;
}

/// Data associated with a draggable puzzle node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Current position of the node.
    pub position: Point2,
    /// Display name, `Node_{index}` in cycle order.
    pub label: String,
}

impl NodeData {
    /// Creates a new node at the given position.
    #[must_use]
    pub fn new(position: Point2, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}
