//! Minimal state, environment and goal used by the unit tests of this crate.

use nalgebra as na;
use rand::Rng;

use crate::bounds::{BBox, Bounded};
use crate::state::{Environment, Region, State};

pub(crate) fn point2(x: f32, y: f32) -> na::Point2<f32> {
    na::Point2::new(x, y)
}

pub(crate) fn bbox(x0: f32, y0: f32, x1: f32, y1: f32) -> BBox<2> {
    BBox::new(point2(x0, y0), point2(x1, y1))
}

impl<const N: usize> State for na::Point<f32, N> {
    type Domain = BBox<N>;

    fn sample<R: Rng + ?Sized>(domain: &BBox<N>, rng: &mut R) -> Self {
        domain.sample(rng)
    }

    fn distance(&self, other: &Self) -> f32 {
        na::distance(self, other)
    }

    fn comparison_cost(&self, other: &Self) -> f32 {
        na::distance_squared(self, other)
    }

    fn steer(&self, towards: &Self, max_step: f32) -> Self {
        self + (towards - self).cap_magnitude(max_step)
    }
}

impl<const N: usize> Region<na::Point<f32, N>, N> for BBox<N> {
    fn contains(&self, state: &na::Point<f32, N>) -> bool {
        self.contains_point(state)
    }
}

/// Bounded field with box shaped walls. Segments are checked by dense sampling, which is good
/// enough for tests.
pub(crate) struct Field {
    pub bounds: BBox<2>,
    pub walls: Vec<BBox<2>>,
}

impl Field {
    pub fn open(width: f32, height: f32) -> Self {
        Field {
            bounds: bbox(0.0, 0.0, width, height),
            walls: Vec::new(),
        }
    }

    pub fn with_wall(mut self, wall: BBox<2>) -> Self {
        self.walls.push(wall);
        self
    }
}

impl Bounded<2> for Field {
    fn bounding_box(&self) -> BBox<2> {
        self.bounds
    }
}

impl Environment<na::Point2<f32>, 2> for Field {
    fn domain(&self) -> &BBox<2> {
        &self.bounds
    }

    fn is_free(&self, state: &na::Point2<f32>) -> bool {
        !self.walls.iter().any(|w| w.contains_point(state))
    }

    fn segment_collides(&self, from: &na::Point2<f32>, to: &na::Point2<f32>) -> bool {
        const STEPS: usize = 64;
        (0..=STEPS).any(|i| {
            let t = i as f32 / STEPS as f32;
            !self.is_free(&na::Point2::from(from.coords.lerp(&to.coords, t)))
        })
    }
}
