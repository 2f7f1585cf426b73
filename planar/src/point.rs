use nalgebra as na;
use rand::Rng;

use rrt_star::{BBox, State};

/// States that occupy a single position in the plane. Collision checking and goal membership only
/// look at this position.
pub trait Planar {
    fn position(&self) -> na::Point2<f32>;
}

/// Plain position in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point(pub na::Point2<f32>);

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point(na::Point2::new(x, y))
    }

    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<na::Point2<f32>> for Point {
    fn from(p: na::Point2<f32>) -> Self {
        Point(p)
    }
}

impl Planar for Point {
    #[inline(always)]
    fn position(&self) -> na::Point2<f32> {
        self.0
    }
}

impl State for Point {
    type Domain = BBox<2>;

    fn sample<R: Rng + ?Sized>(domain: &BBox<2>, rng: &mut R) -> Self {
        Point(domain.sample(rng))
    }

    fn distance(&self, other: &Self) -> f32 {
        na::distance(&self.0, &other.0)
    }

    fn comparison_cost(&self, other: &Self) -> f32 {
        na::distance_squared(&self.0, &other.0)
    }

    fn steer(&self, towards: &Self, max_step: f32) -> Self {
        let dist = self.distance(towards);
        if dist <= max_step {
            *towards
        } else {
            Point(self.0 + (towards.0 - self.0) * (max_step / dist))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_returns_target_within_reach() {
        let from = Point::new(1.0, 1.0);
        let to = Point::new(1.3, 1.4);
        assert_eq!(from.steer(&to, 0.5), to);
        assert_eq!(from.steer(&to, 1.0), to);
    }

    #[test]
    fn steer_moves_exactly_one_step() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(30.0, 40.0);
        let step = from.steer(&to, 0.5);
        assert!((from.distance(&step) - 0.5).abs() < 1e-6);
        assert!((step.x() - 0.3).abs() < 1e-6);
        assert!((step.y() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn comparison_cost_is_squared_distance() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.comparison_cost(&b), 25.0);
        assert_eq!(Point::comparison_threshold(4.0), 16.0);
    }
}
