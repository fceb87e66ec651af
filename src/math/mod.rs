pub mod bounds_2d;
pub mod intersect_2d;
pub mod orient_2d;

pub use bounds_2d::MovementBounds;
pub use intersect_2d::segments_intersect;
pub use orient_2d::orientation;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns whether both coordinates of `p` are finite.
#[must_use]
pub fn is_finite_point(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
