use serde::{Deserialize, Serialize};

use super::Point2;

/// Axis-aligned rectangle centred on the origin that node drags are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementBounds {
    /// Half of the rectangle's width.
    pub half_x: f64,
    /// Half of the rectangle's height.
    pub half_y: f64,
}

impl MovementBounds {
    /// Creates bounds from half-extents. Negative extents are treated as their
    /// absolute value.
    #[must_use]
    pub fn new(half_x: f64, half_y: f64) -> Self {
        Self {
            half_x: half_x.abs(),
            half_y: half_y.abs(),
        }
    }

    /// Creates bounds from the full width and height of the play area.
    #[must_use]
    pub fn from_area(width: f64, height: f64) -> Self {
        Self::new(width / 2.0, height / 2.0)
    }

    /// Clamps `point` into the rectangle.
    #[must_use]
    pub fn clamp(&self, point: &Point2) -> Point2 {
        Point2::new(
            point.x.clamp(-self.half_x, self.half_x),
            point.y.clamp(-self.half_y, self.half_y),
        )
    }

    /// Returns whether `point` lies inside the rectangle (boundary included).
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        point.x.abs() <= self.half_x && point.y.abs() <= self.half_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn from_area_halves_extents() {
        let b = MovementBounds::from_area(16.0, 9.0);
        assert_abs_diff_eq!(b.half_x, 8.0);
        assert_abs_diff_eq!(b.half_y, 4.5);
    }

    #[test]
    fn clamp_pulls_outside_point_to_edge() {
        let b = MovementBounds::new(2.0, 1.0);
        let c = b.clamp(&Point2::new(5.0, -3.0));
        assert_abs_diff_eq!(c.x, 2.0);
        assert_abs_diff_eq!(c.y, -1.0);
        assert!(b.contains(&c));
    }

    #[test]
    fn clamp_keeps_inside_point() {
        let b = MovementBounds::new(2.0, 1.0);
        let pt = Point2::new(0.5, -0.25);
        assert_eq!(b.clamp(&pt), pt);
    }

    #[test]
    fn contains_rejects_outside() {
        let b = MovementBounds::new(1.0, 1.0);
        assert!(!b.contains(&Point2::new(1.5, 0.0)));
    }
}
