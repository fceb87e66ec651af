use super::{orientation, Point2};

/// Segment-segment intersection test in 2D.
///
/// Returns `true` when segment `a–b` and segment `c–d` cross, touch at an
/// endpoint, or overlap collinearly. Boundary contact counts as intersecting:
/// both orientation products are compared with `<= 0`, so a rope that merely
/// touches another is treated as crossed.
///
/// All-collinear inputs make every orientation zero, so two disjoint segments
/// lying on the same line also report `true`.
///
/// Non-finite input (or an orientation that overflows) cannot be classified
/// and also reports `true`, so a blown-up layout never reads as untangled.
#[must_use]
pub fn segments_intersect(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let cross1 = orientation(c, d, a) * orientation(c, d, b);
    let cross2 = orientation(a, b, c) * orientation(a, b, d);
    if cross1.is_nan() || cross2.is_nan() {
        return true;
    }
    cross1 <= 0.0 && cross2 <= 0.0
}
