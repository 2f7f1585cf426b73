use nalgebra as na;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: na::Point2<f32>,
    pub to: na::Point2<f32>,
}

impl Segment {
    pub fn new(from: na::Point2<f32>, to: na::Point2<f32>) -> Self {
        Segment { from, to }
    }

    pub fn length(&self) -> f32 {
        na::distance(&self.from, &self.to)
    }

    /// Whether the two closed segments share a point. Both intersection parameters have to lie in
    /// `[0, 1]`. Parallel segments, collinear ones included, never intersect.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = self.to - self.from;
        let d2 = other.to - other.from;
        let offset = self.from - other.from;

        let denom = d2.y * d1.x - d2.x * d1.y;
        if denom == 0.0 {
            return false;
        }

        let t = (d2.x * offset.y - d2.y * offset.x) / denom;
        let u = (d1.x * offset.y - d1.y * offset.x) / denom;

        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }
}
