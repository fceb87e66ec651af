use std::sync::atomic::{AtomicBool, Ordering};

use slotmap::SecondaryMap;
use tracing::{debug, info, warn};

use crate::config::LayoutParams;
use crate::error::Result;
use crate::math::{is_finite_point, MovementBounds, Point2, Vector2, TOLERANCE};
use crate::operations::query::{Scan, ScanMode, ScanResult};
use crate::topology::{NodeId, Topology};

/// Outcome of a relaxation run.
#[derive(Debug, Clone)]
pub struct RelaxReport {
    /// `true` if a crossing-free layout was reached within the budget.
    pub resolved: bool,
    /// Number of iterations that moved the nodes.
    pub iterations: usize,
    /// `true` if the run stopped because cancellation was requested.
    pub cancelled: bool,
    /// `true` if the run stopped because a step would have moved a node to a
    /// non-finite position. The last finite layout is kept.
    pub diverged: bool,
    /// The skip-mode scan of the final layout.
    pub last_scan: ScanResult,
}

/// Force-directed relaxation that pushes the rope cycle towards a layout
/// without crossings.
///
/// Every iteration applies inverse-square repulsion between all node pairs and
/// a linear spring along every incident rope, then re-scans in skip mode. The
/// loop stops on the first crossing-free scan or when `max_iterations` is
/// exhausted; an exhausted budget is a normal result, and the nodes are left
/// where the last iteration put them. Parameters strong enough to blow the
/// layout up end the run early as unresolved.
pub struct Relax<'a> {
    params: &'a LayoutParams,
    bounds: Option<MovementBounds>,
}

impl<'a> Relax<'a> {
    /// Creates a new `Relax` operation.
    #[must_use]
    pub fn new(params: &'a LayoutParams) -> Self {
        Self {
            params,
            bounds: None,
        }
    }

    /// Movement bounds applied to relaxed positions when
    /// [`LayoutParams::clamp_to_bounds`] is set.
    #[must_use]
    pub fn with_bounds(mut self, bounds: MovementBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Runs the relaxation to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology references missing nodes or ropes.
    pub fn execute(&self, topology: &mut Topology) -> Result<RelaxReport> {
        self.execute_with_cancel(topology, &AtomicBool::new(false))
    }

    /// Runs the relaxation, checking `cancel` before every iteration.
    ///
    /// The flag is never observed mid-iteration, so a cancelled run always
    /// leaves a fully updated layout behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology references missing nodes or ropes.
    pub fn execute_with_cancel(
        &self,
        topology: &mut Topology,
        cancel: &AtomicBool,
    ) -> Result<RelaxReport> {
        let params = self.params;
        let scan = Scan::new(ScanMode::Skip);
        let neighbours = neighbour_lists(topology);

        debug!(
            nodes = topology.node_count(),
            max_iterations = params.max_iterations,
            "relaxation started"
        );

        let mut last_scan = scan.execute(topology)?;
        if params.max_iterations == 0 {
            return Ok(RelaxReport {
                resolved: last_scan.is_solved(),
                iterations: 0,
                cancelled: false,
                diverged: false,
                last_scan,
            });
        }

        for iteration in 1..=params.max_iterations {
            if cancel.load(Ordering::Relaxed) {
                info!(iteration, "relaxation cancelled");
                return Ok(RelaxReport {
                    resolved: false,
                    iterations: iteration - 1,
                    cancelled: true,
                    diverged: false,
                    last_scan,
                });
            }

            if !self.step(topology, &neighbours)? {
                warn!(iteration, "relaxation diverged, keeping last finite layout");
                return Ok(RelaxReport {
                    resolved: false,
                    iterations: iteration - 1,
                    cancelled: false,
                    diverged: true,
                    last_scan,
                });
            }
            last_scan = scan.execute(topology)?;

            if last_scan.is_solved() {
                info!(iterations = iteration, "relaxation reached a crossing-free layout");
                return Ok(RelaxReport {
                    resolved: true,
                    iterations: iteration,
                    cancelled: false,
                    diverged: false,
                    last_scan,
                });
            }
        }

        info!(
            iterations = params.max_iterations,
            crossing_pairs = last_scan.crossing_pairs,
            "relaxation budget exhausted"
        );
        Ok(RelaxReport {
            resolved: false,
            iterations: params.max_iterations,
            cancelled: false,
            diverged: false,
            last_scan,
        })
    }

    /// Moves every node once, with all forces taken from the same snapshot.
    ///
    /// Returns `false` without moving anything if any new position would be
    /// non-finite.
    fn step(&self, topology: &mut Topology, neighbours: &[Vec<usize>]) -> Result<bool> {
        let snapshot = topology.positions();
        let clamp = self.bounds.filter(|_| self.params.clamp_to_bounds);
        let next: Vec<Point2> = snapshot
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                let disp = self.displacement(i, &snapshot, &neighbours[i]);
                let moved = *pos + disp * self.params.step_size;
                match clamp {
                    Some(bounds) => bounds.clamp(&moved),
                    None => moved,
                }
            })
            .collect();

        if !next.iter().all(is_finite_point) {
            return Ok(false);
        }
        let ids = topology.node_ids().to_vec();
        for (id, pos) in ids.into_iter().zip(next) {
            topology.set_position(id, pos)?;
        }
        Ok(true)
    }

    /// Net displacement of node `i`: repulsion from all nodes plus attraction
    /// towards the far end of each incident rope.
    fn displacement(&self, i: usize, snapshot: &[Point2], neighbours: &[usize]) -> Vector2 {
        let params = self.params;
        let pos = snapshot[i];
        let mut disp = Vector2::zeros();

        for (j, other) in snapshot.iter().enumerate() {
            if j == i {
                continue;
            }
            let dir = pos - *other;
            let dist = dir.norm().max(params.min_distance);
            // Coincident nodes have no direction to push along.
            if let Some(unit) = dir.try_normalize(TOLERANCE) {
                disp += unit * (params.repulsion_strength / (dist * dist));
            }
        }

        for &j in neighbours {
            disp += (snapshot[j] - pos) * params.attraction_strength;
        }

        disp
    }
}

/// For each node (by cycle index), the cycle index of the far end of every
/// incident rope. A neighbour joined by two ropes appears twice.
fn neighbour_lists(topology: &Topology) -> Vec<Vec<usize>> {
    let mut index: SecondaryMap<NodeId, usize> = SecondaryMap::new();
    for (i, &id) in topology.node_ids().iter().enumerate() {
        index.insert(id, i);
    }
    topology
        .node_ids()
        .iter()
        .map(|&id| {
            topology
                .incident_ropes(id)
                .filter_map(|(_, other)| index.get(other).copied())
                .collect()
        })
        .collect()
}
