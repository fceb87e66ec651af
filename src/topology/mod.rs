pub mod node;
pub mod rope;

pub use node::{NodeData, NodeId};
pub use rope::{RopeData, RopeEndpoints, RopeId, RopeStatus};

use crate::error::TopologyError;
use crate::math::Point2;
use slotmap::SlotMap;

/// Central arena that owns the nodes and ropes of one puzzle level.
///
/// Entities reference each other via typed IDs (generational indices). The
/// node count is fixed once the cycle is built; only positions and rope
/// highlight states change afterwards.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: SlotMap<NodeId, NodeData>,
    ropes: SlotMap<RopeId, RopeData>,
    cycle: Vec<NodeId>,
    rope_order: Vec<RopeId>,
    offset_distance: f64,
}

impl Topology {
    /// Builds the node cycle and its ropes from the given node positions.
    ///
    /// For each index `i` two ropes are created: `i → i+1` and `i+1 → i`
    /// (indices mod `N`). With exactly two nodes, both cycle steps connect the
    /// same pair, so four mutually adjacent ropes are created.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if fewer than two positions
    /// are supplied.
    pub fn build_cycle(positions: &[Point2], offset_distance: f64) -> Result<Self, TopologyError> {
        let n = positions.len();
        if n < 2 {
            return Err(TopologyError::InvalidTopology(format!(
                "a rope cycle needs at least 2 nodes, got {n}"
            )));
        }

        let mut nodes = SlotMap::with_capacity_and_key(n);
        let cycle: Vec<NodeId> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| nodes.insert(NodeData::new(p, format!("Node_{i}"))))
            .collect();

        let mut ropes = SlotMap::with_capacity_and_key(2 * n);
        let mut rope_order = Vec::with_capacity(2 * n);
        for i in 0..n {
            let a = cycle[i];
            let b = cycle[(i + 1) % n];
            rope_order.push(ropes.insert(RopeData::new(a, b)));
            rope_order.push(ropes.insert(RopeData::new(b, a)));
        }

        Ok(Self {
            nodes,
            ropes,
            cycle,
            rope_order,
            offset_distance,
        })
    }

    /// Distance the start end of every rope is pushed along the rope.
    #[must_use]
    pub fn offset_distance(&self) -> f64 {
        self.offset_distance
    }

    // --- Node operations ---

    /// Returns the node IDs in cycle order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.cycle
    }

    /// Number of nodes in the cycle.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.cycle.len()
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the arena.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, TopologyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node".into()))
    }

    /// Returns a mutable reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the arena.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, TopologyError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node".into()))
    }

    /// Moves a node to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the arena.
    pub fn set_position(&mut self, id: NodeId, position: Point2) -> Result<(), TopologyError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Snapshot of all node positions in cycle order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.cycle
            .iter()
            .filter_map(|&id| self.nodes.get(id).map(|n| n.position))
            .collect()
    }

    // --- Rope operations ---

    /// Returns the rope IDs in creation order.
    #[must_use]
    pub fn rope_ids(&self) -> &[RopeId] {
        &self.rope_order
    }

    /// Number of directed ropes (twice the edge count).
    #[must_use]
    pub fn rope_count(&self) -> usize {
        self.rope_order.len()
    }

    /// Number of undirected edges, one per cycle step.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rope_order.len() / 2
    }

    /// Returns a reference to the rope data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the arena.
    pub fn rope(&self, id: RopeId) -> Result<&RopeData, TopologyError> {
        self.ropes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("rope".into()))
    }

    /// Sets the highlight state of a rope.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the arena.
    pub fn set_rope_status(&mut self, id: RopeId, status: RopeStatus) -> Result<(), TopologyError> {
        self.ropes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("rope".into()))?
            .status = status;
        Ok(())
    }

    /// Computes the current rendered segment of a rope.
    ///
    /// # Errors
    ///
    /// Returns an error if the rope or one of its nodes is not found.
    pub fn rope_endpoints(&self, id: RopeId) -> Result<RopeEndpoints, TopologyError> {
        let rope = self.rope(id)?;
        let from = self.node(rope.from)?.position;
        let to = self.node(rope.to)?.position;
        Ok(RopeEndpoints::compute(&from, &to, self.offset_distance))
    }

    /// Returns whether two ropes meet at a common node.
    ///
    /// # Errors
    ///
    /// Returns an error if either rope is not found.
    pub fn share_endpoint(&self, a: RopeId, b: RopeId) -> Result<bool, TopologyError> {
        Ok(self.rope(a)?.shares_node_with(self.rope(b)?))
    }

    /// Iterates over the ropes incident to `node`, yielding each rope together
    /// with the node at its other end.
    pub fn incident_ropes(&self, node: NodeId) -> impl Iterator<Item = (RopeId, NodeId)> + '_ {
        self.rope_order.iter().filter_map(move |&id| {
            let other = self.ropes.get(id)?.opposite(node)?;
            Some((id, other))
        })
    }
}
