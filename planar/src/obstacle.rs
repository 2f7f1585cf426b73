use itertools::Itertools;
use nalgebra as na;
use rand::Rng;

use rrt_star::{BBox, Bounded, Region};

use crate::point::Planar;
use crate::segment::Segment;

/// Axis aligned rectangle, used both for obstacles and for goal regions. Points on the border
/// belong to the rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    /// Lowest corner.
    pub corner: na::Point2<f32>,
    pub size: na::Vector2<f32>,
}

impl Rectangle {
    pub fn new(corner: na::Point2<f32>, size: na::Vector2<f32>) -> Self {
        Self { corner, size }
    }

    /// Rectangle anchored at its top left corner `(x, y)`, spanning `dx` to the right and `dy`
    /// downwards. This is the layout maps and CSV files use.
    pub fn from_top_left(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self::new(na::Point2::new(x, y - dy), na::Vector2::new(dx, dy))
    }

    /// Random rectangle whose top left corner is uniform in `bounds` and whose sides are uniform in
    /// `[0, size_bound)`. It may stick out of `bounds`.
    pub fn random<R: Rng + ?Sized>(bounds: &BBox<2>, size_bound: f32, rng: &mut R) -> Self {
        let top_left = bounds.sample(rng);
        let dx = rng.gen::<f32>() * size_bound;
        let dy = rng.gen::<f32>() * size_bound;
        Self::from_top_left(top_left.x, top_left.y, dx, dy)
    }

    pub fn top_left(&self) -> na::Point2<f32> {
        na::Point2::new(self.corner.x, self.corner.y + self.size.y)
    }

    /// The four vertices in clockwise order, starting at the top left one.
    pub fn vertices(&self) -> [na::Point2<f32>; 4] {
        let (x0, y0) = (self.corner.x, self.corner.y);
        let (x1, y1) = (x0 + self.size.x, y0 + self.size.y);
        [
            na::Point2::new(x0, y1),
            na::Point2::new(x1, y1),
            na::Point2::new(x1, y0),
            na::Point2::new(x0, y0),
        ]
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> {
        self.vertices()
            .into_iter()
            .circular_tuple_windows()
            .map(|(a, b)| Segment::new(a, b))
    }

    pub fn contains(&self, p: &na::Point2<f32>) -> bool {
        itertools::izip!(p.iter(), self.corner.iter(), self.size.iter())
            .all(|(&p_coord, &corner_coord, &sz)| (corner_coord..=corner_coord + sz).contains(&p_coord))
    }

    /// Whether `segment` crosses or touches the border of the rectangle. A segment that lies
    /// entirely inside does not cross the border; check its endpoints with
    /// [`Rectangle::contains`] for that.
    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        self.edges().any(|edge| edge.intersects(segment))
    }
}

impl Bounded<2> for Rectangle {
    fn bounding_box(&self) -> BBox<2> {
        BBox::new(self.corner, self.corner + self.size)
    }
}

impl<S: Planar> Region<S, 2> for Rectangle {
    fn contains(&self, state: &S) -> bool {
        Rectangle::contains(self, &state.position())
    }
}
