use std::f64::consts::PI;

use rand::Rng;

use crate::math::Point2;

/// Samples starting node positions uniformly inside a disk centred on the
/// origin.
pub struct SpawnNodes {
    count: usize,
    radius: f64,
}

impl SpawnNodes {
    /// Creates a new `SpawnNodes` operation.
    #[must_use]
    pub fn new(count: usize, radius: f64) -> Self {
        Self { count, radius }
    }

    /// Draws `count` points from `rng`.
    ///
    /// Uses `r = radius * sqrt(u)` so the points are uniform over the disk area
    /// rather than bunched at the centre.
    pub fn execute<R: Rng>(&self, rng: &mut R) -> Vec<Point2> {
        (0..self.count)
            .map(|_| {
                let r = self.radius * rng.random::<f64>().sqrt();
                let theta = 2.0 * PI * rng.random::<f64>();
                Point2::new(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_requested_count_inside_disk() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = SpawnNodes::new(200, 5.0).execute(&mut rng);
        assert_eq!(points.len(), 200);
        for p in &points {
            assert!(p.coords.norm() <= 5.0 + 1e-12, "p={p:?}");
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = SpawnNodes::new(8, 3.0).execute(&mut StdRng::seed_from_u64(42));
        let b = SpawnNodes::new(8, 3.0).execute(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn samples_reach_the_outer_half() {
        // Half of the disk's area lies beyond radius / sqrt(2).
        let mut rng = StdRng::seed_from_u64(1);
        let points = SpawnNodes::new(1000, 1.0).execute(&mut rng);
        let outer = points
            .iter()
            .filter(|p| p.coords.norm() > std::f64::consts::FRAC_1_SQRT_2)
            .count();
        assert!((400..600).contains(&outer), "outer={outer}");
    }

    #[test]
    fn zero_radius_collapses_to_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        for p in SpawnNodes::new(4, 0.0).execute(&mut rng) {
            assert_eq!(p.coords.norm(), 0.0);
        }
    }
}
