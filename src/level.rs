//! Level controller: owns one puzzle's topology and turns scan verdicts into
//! completion events.
//!
//! The surrounding game polls [`Level::poll_event`] instead of subscribing to
//! callbacks. At most one completion is ever queued per level; afterwards the
//! level rejects further moves.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::LevelConfig;
use crate::error::{LevelError, Result};
use crate::math::{is_finite_point, MovementBounds, Point2};
use crate::operations::creation::SpawnNodes;
use crate::operations::layout::Relax;
use crate::operations::query::{Outcome, Scan, ScanMode, ScanResult};
use crate::topology::{NodeId, Topology};

/// How a level was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The player removed the last crossing.
    Solved,
    /// The auto-resolve removed the last crossing.
    SolvedBySkip,
}

/// Score awarded for solving a level by hand.
pub const SOLVE_REWARD: u32 = 350;

impl Completion {
    /// Score the game should add for this completion. Skipped levels earn
    /// nothing.
    #[must_use]
    pub fn score_award(self) -> u32 {
        match self {
            Completion::Solved => SOLVE_REWARD,
            Completion::SolvedBySkip => 0,
        }
    }
}

/// Event queued for the surrounding game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// The level was completed; queued at most once.
    Completed(Completion),
}

/// Whether the level still accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    /// Crossings remain and the player may drag nodes.
    Playing,
    /// Completed; every further move is rejected.
    Complete(Completion),
}

/// One puzzle level.
#[derive(Debug)]
pub struct Level {
    topology: Topology,
    config: LevelConfig,
    bounds: MovementBounds,
    state: LevelState,
    events: VecDeque<LevelEvent>,
}

impl Level {
    /// Sets up a level with node positions drawn from `rng`.
    ///
    /// Returns the level and the result of its initial scan. A random start
    /// that happens to have no crossings completes immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or asks for fewer than two
    /// nodes.
    pub fn setup<R: Rng>(config: &LevelConfig, rng: &mut R) -> Result<(Self, ScanResult)> {
        config.validate()?;
        let positions = SpawnNodes::new(config.node_count, config.spawn_radius).execute(rng);
        Self::with_positions(config, &positions)
    }

    /// Sets up a level using the config's seed, or OS entropy when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or asks for fewer than two
    /// nodes.
    pub fn generate(config: &LevelConfig) -> Result<(Self, ScanResult)> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::setup(config, &mut rng)
    }

    /// Sets up a level from explicit node positions, in cycle order.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, fewer than two positions
    /// are given, or a position is not finite.
    pub fn with_positions(config: &LevelConfig, positions: &[Point2]) -> Result<(Self, ScanResult)> {
        config.validate()?;
        if let Some(p) = positions.iter().find(|p| !is_finite_point(p)) {
            return Err(LevelError::InvalidPosition { x: p.x, y: p.y }.into());
        }
        let topology = Topology::build_cycle(positions, config.offset_distance)?;
        let mut level = Self {
            topology,
            config: config.clone(),
            bounds: config.bounds(),
            state: LevelState::Playing,
            events: VecDeque::new(),
        };
        debug!(nodes = level.topology.node_count(), "level set up");
        let result = level.scan(ScanMode::Player)?;
        Ok((level, result))
    }

    /// The level's topology, for rendering.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Rectangle node drags are clamped to.
    #[must_use]
    pub fn bounds(&self) -> MovementBounds {
        self.bounds
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LevelState {
        self.state
    }

    /// Moves a node towards `target`, clamped to the movement bounds.
    ///
    /// Returns the position actually applied. Does not re-scan; call
    /// [`Level::on_node_moved`] when the drag is released.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Finished`] once the level is complete,
    /// [`LevelError::InvalidPosition`] for a non-finite target, or an error if
    /// the node does not exist.
    pub fn drag_node(&mut self, id: NodeId, target: Point2) -> Result<Point2> {
        self.ensure_playing()?;
        if !is_finite_point(&target) {
            return Err(LevelError::InvalidPosition {
                x: target.x,
                y: target.y,
            }
            .into());
        }
        let clamped = self.bounds.clamp(&target);
        self.topology.set_position(id, clamped)?;
        Ok(clamped)
    }

    /// Re-checks the ropes after the player released a node.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Finished`] once the level is complete.
    pub fn on_node_moved(&mut self) -> Result<ScanResult> {
        self.ensure_playing()?;
        self.scan(ScanMode::Player)
    }

    /// Runs the auto-resolve and returns its final skip-mode scan.
    ///
    /// Failing to untangle within the budget is a normal result: the returned
    /// scan then still reports crossings and no event is queued.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Finished`] once the level is complete.
    pub fn request_auto_resolve(&mut self) -> Result<ScanResult> {
        self.request_auto_resolve_with_cancel(&AtomicBool::new(false))
    }

    /// Like [`Level::request_auto_resolve`], stopping early between iterations
    /// once `cancel` is set.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Finished`] once the level is complete.
    pub fn request_auto_resolve_with_cancel(&mut self, cancel: &AtomicBool) -> Result<ScanResult> {
        self.ensure_playing()?;
        let report = Relax::new(&self.config.layout)
            .with_bounds(self.bounds)
            .execute_with_cancel(&mut self.topology, cancel)?;
        info!(
            resolved = report.resolved,
            iterations = report.iterations,
            cancelled = report.cancelled,
            diverged = report.diverged,
            "auto-resolve finished"
        );
        self.record(&report.last_scan);
        Ok(report.last_scan)
    }

    /// Pops the oldest queued event.
    pub fn poll_event(&mut self) -> Option<LevelEvent> {
        self.events.pop_front()
    }

    fn scan(&mut self, mode: ScanMode) -> Result<ScanResult> {
        let result = Scan::new(mode).execute(&mut self.topology)?;
        self.record(&result);
        Ok(result)
    }

    fn record(&mut self, result: &ScanResult) {
        if self.state != LevelState::Playing {
            return;
        }
        let completion = match result.outcome {
            Outcome::None => return,
            Outcome::Solved => Completion::Solved,
            Outcome::SolvedBySkip => Completion::SolvedBySkip,
        };
        info!(?completion, "level complete");
        self.state = LevelState::Complete(completion);
        self.events.push_back(LevelEvent::Completed(completion));
    }

    fn ensure_playing(&self) -> Result<()> {
        match self.state {
            LevelState::Playing => Ok(()),
            LevelState::Complete(_) => Err(LevelError::Finished.into()),
        }
    }
}
