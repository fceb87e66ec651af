//! Level and auto-resolve configuration.
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::MovementBounds;

/// Parameters of the force-directed auto-resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Scale of the inverse-square push between every pair of nodes.
    pub repulsion_strength: f64,
    /// Spring constant pulling a node towards the far end of each incident rope.
    pub attraction_strength: f64,
    /// Fraction of the net displacement applied per iteration.
    pub step_size: f64,
    /// Iteration budget before the resolve gives up.
    pub max_iterations: usize,
    /// Floor on the distance used in the repulsion term.
    pub min_distance: f64,
    /// Clamp relaxed positions to the level's movement bounds.
    pub clamp_to_bounds: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            repulsion_strength: 0.3,
            attraction_strength: 0.45,
            step_size: 0.2,
            max_iterations: 3000,
            min_distance: 0.1,
            clamp_to_bounds: false,
        }
    }
}

impl LayoutParams {
    /// Checks that every parameter is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        finite("repulsion_strength", self.repulsion_strength)?;
        finite("attraction_strength", self.attraction_strength)?;
        non_negative("step_size", self.step_size)?;
        positive("min_distance", self.min_distance)?;
        Ok(())
    }
}

/// Configuration of one puzzle level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of nodes in the cycle.
    pub node_count: usize,
    /// Radius of the disk the nodes are spawned in.
    pub spawn_radius: f64,
    /// How far each rope's start is pushed along the rope away from its node.
    pub offset_distance: f64,
    /// Full width of the area nodes may be dragged in.
    pub area_width: f64,
    /// Full height of the area nodes may be dragged in.
    pub area_height: f64,
    /// Seed for node placement. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Auto-resolve parameters.
    pub layout: LayoutParams,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            node_count: 5,
            spawn_radius: 5.0,
            offset_distance: 0.2,
            area_width: 12.0,
            area_height: 12.0,
            seed: None,
            layout: LayoutParams::default(),
        }
    }
}

impl LevelConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidParameter`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is finite and in range.
    ///
    /// The node count is not checked here; too few nodes is reported by the
    /// cycle builder as an invalid topology.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        non_negative("spawn_radius", self.spawn_radius)?;
        non_negative("offset_distance", self.offset_distance)?;
        positive("area_width", self.area_width)?;
        positive("area_height", self.area_height)?;
        self.layout.validate()
    }

    /// Movement bounds derived from the area size.
    #[must_use]
    pub fn bounds(&self) -> MovementBounds {
        MovementBounds::from_area(self.area_width, self.area_height)
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            parameter,
            value,
            reason: "must be finite",
        }
        .into())
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<()> {
    finite(parameter, value)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidParameter {
            parameter,
            value,
            reason: "must not be negative",
        }
        .into());
    }
    Ok(())
}

fn positive(parameter: &'static str, value: f64) -> Result<()> {
    finite(parameter, value)?;
    if value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            parameter,
            value,
            reason: "must be positive",
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UntangleError;

    #[test]
    fn defaults_are_valid() {
        LevelConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = LevelConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LevelConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = LevelConfig::from_json_str(
            r#"{ "node_count": 9, "seed": 11, "layout": { "max_iterations": 50 } }"#,
        )
        .unwrap();
        assert_eq!(config.node_count, 9);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.layout.max_iterations, 50);
        assert_eq!(config.layout.step_size, LayoutParams::default().step_size);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LevelConfig::from_json_str("{ node_count: ").unwrap_err();
        assert!(matches!(err, UntangleError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn negative_step_is_rejected() {
        let err = LevelConfig::from_json_str(r#"{ "layout": { "step_size": -0.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            UntangleError::Config(ConfigError::InvalidParameter {
                parameter: "step_size",
                ..
            })
        ));
    }

    #[test]
    fn zero_min_distance_is_rejected() {
        let params = LayoutParams {
            min_distance: 0.0,
            ..LayoutParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn bounds_are_half_the_area() {
        let config = LevelConfig {
            area_width: 10.0,
            area_height: 4.0,
            ..LevelConfig::default()
        };
        assert_eq!(config.bounds(), MovementBounds::new(5.0, 2.0));
    }
}
