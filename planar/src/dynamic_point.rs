use nalgebra as na;
use rand::Rng;

use rrt_star::{BBox, State};

use crate::point::Planar;

/// A position together with the velocity the vehicle has when it gets there.
///
/// Distances are measured in the four dimensional (x, y, vx, vy) space and steering interpolates
/// all four components, so a steered state stays inside the speed limits whenever both ends are.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicPoint {
    pub position: na::Point2<f32>,
    pub velocity: na::Vector2<f32>,
}

impl DynamicPoint {
    /// Largest magnitude of each velocity component drawn by `sample`.
    pub const MAX_SPEED: f32 = 5.0;

    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        DynamicPoint {
            position: na::Point2::new(x, y),
            velocity: na::Vector2::new(vx, vy),
        }
    }

    pub fn at_rest(x: f32, y: f32) -> Self {
        DynamicPoint::new(x, y, 0.0, 0.0)
    }

    fn to_vector(self) -> na::Vector4<f32> {
        na::Vector4::new(self.position.x, self.position.y, self.velocity.x, self.velocity.y)
    }

    fn from_vector(v: na::Vector4<f32>) -> Self {
        DynamicPoint::new(v.x, v.y, v.z, v.w)
    }
}

impl Planar for DynamicPoint {
    #[inline(always)]
    fn position(&self) -> na::Point2<f32> {
        self.position
    }
}

impl State for DynamicPoint {
    type Domain = BBox<2>;

    fn sample<R: Rng + ?Sized>(domain: &BBox<2>, rng: &mut R) -> Self {
        let position = domain.sample(rng);
        let velocity = na::Vector2::new(
            rng.gen_range(-Self::MAX_SPEED..=Self::MAX_SPEED),
            rng.gen_range(-Self::MAX_SPEED..=Self::MAX_SPEED),
        );
        DynamicPoint { position, velocity }
    }

    fn distance(&self, other: &Self) -> f32 {
        (other.to_vector() - self.to_vector()).magnitude()
    }

    fn comparison_cost(&self, other: &Self) -> f32 {
        (other.to_vector() - self.to_vector()).magnitude_squared()
    }

    fn steer(&self, towards: &Self, max_step: f32) -> Self {
        let delta = towards.to_vector() - self.to_vector();
        let dist = delta.magnitude();
        if dist <= max_step {
            *towards
        } else {
            DynamicPoint::from_vector(self.to_vector() + delta * (max_step / dist))
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn distance_includes_velocity() {
        let a = DynamicPoint::new(0.0, 0.0, 0.0, 0.0);
        let b = DynamicPoint::new(0.0, 0.0, 3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.comparison_cost(&b), 25.0);
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn steer_interpolates_every_component() {
        let a = DynamicPoint::at_rest(0.0, 0.0);
        let b = DynamicPoint::new(2.0, 0.0, 2.0, 0.0);
        let step = a.steer(&b, 2.0_f32.sqrt());
        assert!((step.position.x - 1.0).abs() < 1e-5);
        assert!((step.velocity.x - 1.0).abs() < 1e-5);
        assert_eq!(a.steer(&b, 10.0), b);
    }

    #[test]
    fn samples_respect_bounds_and_speed() {
        let domain = BBox::new(na::Point2::new(0.0, 0.0), na::Point2::new(5.0, 8.0));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let s = DynamicPoint::sample(&domain, &mut rng);
            assert!(domain.contains_point(&s.position));
            assert!(s.velocity.iter().all(|v| v.abs() <= DynamicPoint::MAX_SPEED));
        }
    }
}
