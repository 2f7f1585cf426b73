use log::debug;
use nalgebra as na;
use rand::Rng;

use rrt_star::{BBox, Bounded, Environment, State};

use crate::obstacle::Rectangle;
use crate::point::Planar;
use crate::segment::Segment;

/// Rectangular world spanning `[0, width] × [0, height]` with rectangular obstacles.
#[derive(Clone, Debug)]
pub struct PlanarEnvironment {
    bounds: BBox<2>,
    obstacles: Vec<Rectangle>,
}

impl PlanarEnvironment {
    pub fn new(width: f32, height: f32) -> Self {
        PlanarEnvironment {
            bounds: BBox::new(na::Point2::origin(), na::Point2::new(width, height)),
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Rectangle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn add_obstacle(&mut self, obstacle: Rectangle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Rectangle] {
        self.obstacles.as_slice()
    }

    pub fn width(&self) -> f32 {
        self.bounds.extents().x
    }

    pub fn height(&self) -> f32 {
        self.bounds.extents().y
    }

    pub fn in_environment(&self, p: &na::Point2<f32>) -> bool {
        self.bounds.contains_point(p)
    }

    pub fn obstacle_free(&self, p: &na::Point2<f32>) -> bool {
        !self.obstacles.iter().any(|o| o.contains(p))
    }

    pub fn segment_blocked(&self, segment: &Segment) -> bool {
        self.obstacles.iter().any(|o| o.intersects_segment(segment))
    }

    /// Adds `count` random obstacles, see [`Rectangle::random`].
    pub fn generate_random_obstacles<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        size_bound: f32,
        rng: &mut R,
    ) {
        self.obstacles.reserve(count);
        for _ in 0..count {
            let obstacle = Rectangle::random(&self.bounds, size_bound, rng);
            self.obstacles.push(obstacle);
        }
        debug!("added {} random obstacles, {} in total", count, self.obstacles.len());
    }
}

impl Bounded<2> for PlanarEnvironment {
    fn bounding_box(&self) -> BBox<2> {
        self.bounds
    }
}

impl<S> Environment<S, 2> for PlanarEnvironment
where
    S: State<Domain = BBox<2>> + Planar,
{
    fn domain(&self) -> &BBox<2> {
        &self.bounds
    }

    fn is_free(&self, state: &S) -> bool {
        self.obstacle_free(&state.position())
    }

    fn segment_collides(&self, from: &S, to: &S) -> bool {
        self.segment_blocked(&Segment::new(from.position(), to.position()))
    }
}
