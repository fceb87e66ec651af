use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Result;
use crate::math::segments_intersect;
use crate::topology::{RopeEndpoints, RopeId, RopeStatus, Topology};

/// Who triggered a scan, which decides how a crossing-free verdict is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// The player released a node.
    Player,
    /// The auto-resolver is checking its own progress.
    Skip,
}

/// Completion verdict of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Crossings remain.
    None,
    /// Crossing-free after a player move.
    Solved,
    /// Crossing-free after auto-resolve.
    SolvedBySkip,
}

/// Result of scanning every rope pair for crossings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Whether any two non-adjacent ropes intersect.
    pub has_crossings: bool,
    /// Ropes involved in at least one crossing.
    pub crossing_ropes: BTreeSet<RopeId>,
    /// Number of crossing rope pairs found.
    pub crossing_pairs: usize,
    /// Ropes whose nodes coincide, evaluated with the zero-offset fallback.
    pub degenerate_ropes: usize,
    /// Completion verdict for this scan.
    pub outcome: Outcome,
}

impl ScanResult {
    /// Returns whether the scan found a crossing-free layout.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.has_crossings
    }
}

/// Checks every pair of non-adjacent ropes for intersections and flags the
/// ropes involved.
///
/// Ropes that meet at a common node are never compared, even if their
/// offset segments overlap near that node. The comparison is brute-force over
/// all `R * (R - 1) / 2` pairs, which is fine for puzzle-sized cycles.
pub struct Scan {
    mode: ScanMode,
}

impl Scan {
    /// Creates a new `Scan` query.
    #[must_use]
    pub fn new(mode: ScanMode) -> Self {
        Self { mode }
    }

    /// Executes the scan, updating each rope's highlight status.
    ///
    /// # Errors
    ///
    /// Returns an error if a rope refers to a node missing from the arena.
    pub fn execute(&self, topology: &mut Topology) -> Result<ScanResult> {
        let ropes: Vec<RopeId> = topology.rope_ids().to_vec();
        let segments: Vec<RopeEndpoints> = ropes
            .iter()
            .map(|&id| topology.rope_endpoints(id))
            .collect::<std::result::Result<_, _>>()?;

        let degenerate_ropes = segments.iter().filter(|s| s.degenerate).count();
        if degenerate_ropes > 0 {
            debug!(degenerate_ropes, "zero-length ropes evaluated without offset");
        }

        let mut crossing_ropes = BTreeSet::new();
        let mut crossing_pairs = 0;
        for i in 0..ropes.len() {
            for j in (i + 1)..ropes.len() {
                if topology.share_endpoint(ropes[i], ropes[j])? {
                    continue;
                }
                let (s1, s2) = (&segments[i], &segments[j]);
                if segments_intersect(&s1.start, &s1.end, &s2.start, &s2.end) {
                    crossing_ropes.insert(ropes[i]);
                    crossing_ropes.insert(ropes[j]);
                    crossing_pairs += 1;
                }
            }
        }

        for &id in &ropes {
            let status = if crossing_ropes.contains(&id) {
                RopeStatus::Crossing
            } else {
                RopeStatus::Clear
            };
            topology.set_rope_status(id, status)?;
        }

        let has_crossings = crossing_pairs > 0;
        let outcome = match (has_crossings, self.mode) {
            (true, _) => Outcome::None,
            (false, ScanMode::Player) => Outcome::Solved,
            (false, ScanMode::Skip) => Outcome::SolvedBySkip,
        };

        Ok(ScanResult {
            has_crossings,
            crossing_ropes,
            crossing_pairs,
            degenerate_ropes,
            outcome,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn bowtie() -> Topology {
        // Cycle (0,0) → (1,1) → (1,0) → (0,1): the diagonals cross.
        Topology::build_cycle(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 1.0),
            ],
            0.2,
        )
        .unwrap()
    }

    fn square() -> Topology {
        Topology::build_cycle(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            0.2,
        )
        .unwrap()
    }

    #[test]
    fn bowtie_has_crossings() {
        let mut topo = bowtie();
        let result = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        assert!(result.has_crossings);
        assert_eq!(result.outcome, Outcome::None);

        // Edge 0 is (0,0)-(1,1), edge 2 is (1,0)-(0,1); all four of their
        // ropes cross each other, and nothing else does.
        let r = topo.rope_ids();
        let expected: BTreeSet<RopeId> = [r[0], r[1], r[4], r[5]].into_iter().collect();
        assert_eq!(result.crossing_ropes, expected);
        assert_eq!(result.crossing_pairs, 4);
    }

    #[test]
    fn crossing_ropes_are_flagged() {
        let mut topo = bowtie();
        Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        let statuses: Vec<RopeStatus> = topo
            .rope_ids()
            .iter()
            .map(|&id| topo.rope(id).unwrap().status)
            .collect();
        assert_eq!(
            statuses,
            [
                RopeStatus::Crossing,
                RopeStatus::Crossing,
                RopeStatus::Clear,
                RopeStatus::Clear,
                RopeStatus::Crossing,
                RopeStatus::Crossing,
                RopeStatus::Clear,
                RopeStatus::Clear,
            ]
        );
    }

    #[test]
    fn flags_are_cleared_once_untangled() {
        let mut topo = bowtie();
        Scan::new(ScanMode::Player).execute(&mut topo).unwrap();

        // Swap nodes 1 and 2 to get the plain square.
        let ids = topo.node_ids().to_vec();
        topo.set_position(ids[1], Point2::new(1.0, 0.0)).unwrap();
        topo.set_position(ids[2], Point2::new(1.0, 1.0)).unwrap();

        let result = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        assert!(!result.has_crossings);
        for &id in topo.rope_ids() {
            assert_eq!(topo.rope(id).unwrap().status, RopeStatus::Clear);
        }
    }

    #[test]
    fn solved_outcome_depends_on_mode() {
        let mut topo = square();
        let player = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        assert_eq!(player.outcome, Outcome::Solved);
        assert!(player.is_solved());

        let skip = Scan::new(ScanMode::Skip).execute(&mut topo).unwrap();
        assert_eq!(skip.outcome, Outcome::SolvedBySkip);
    }

    #[test]
    fn crossings_report_none_in_skip_mode() {
        let mut topo = bowtie();
        let result = Scan::new(ScanMode::Skip).execute(&mut topo).unwrap();
        assert_eq!(result.outcome, Outcome::None);
    }

    #[test]
    fn triangle_never_flags_adjacent_ropes() {
        // Every rope pair in a triangle shares a node, including a flattened one
        // where the offset segments overlap.
        for positions in [
            [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 1.0)],
            [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)],
            [Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        ] {
            let mut topo = Topology::build_cycle(&positions, 0.2).unwrap();
            let result = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
            assert!(!result.has_crossings, "positions={positions:?}");
            assert!(result.crossing_ropes.is_empty());
        }
    }

    #[test]
    fn two_node_cycle_is_always_solved() {
        let mut topo =
            Topology::build_cycle(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], 0.2).unwrap();
        assert_eq!(topo.rope_count(), 4);
        let result = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        assert_eq!(result.outcome, Outcome::Solved);
    }

    #[test]
    fn coincident_nodes_are_counted_not_fatal() {
        let mut topo = Topology::build_cycle(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            0.2,
        )
        .unwrap();
        let result = Scan::new(ScanMode::Player).execute(&mut topo).unwrap();
        // Both ropes of the zero-length edge 0-1 take the fallback.
        assert_eq!(result.degenerate_ropes, 2);
        for &id in topo.rope_ids() {
            let e = topo.rope_endpoints(id).unwrap();
            assert!(e.start.x.is_finite() && e.start.y.is_finite());
        }
    }
}
