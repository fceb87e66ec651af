use super::Point2;

/// Signed cross product of `(p2 - p1)` and `(p3 - p1)`.
///
/// Positive when `p1 → p2 → p3` turns counter-clockwise, negative when it
/// turns clockwise, zero when the three points are collinear. The magnitude is
/// twice the area of the triangle.
#[must_use]
pub fn orientation(p1: &Point2, p2: &Point2, p3: &Point2) -> f64 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}
