use thiserror::Error;

/// Top-level error type for the untangling engine.
#[derive(Debug, Error)]
pub enum UntangleError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Errors related to the node/rope topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to level and layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter {parameter} = {value} is invalid: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the level controller.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level is already complete")]
    Finished,

    #[error("node position ({x}, {y}) is not finite")]
    InvalidPosition { x: f64, y: f64 },
}

/// Convenience type alias for results using [`UntangleError`].
pub type Result<T> = std::result::Result<T, UntangleError>;
