use nalgebra as na;
use rand::Rng;

pub trait Bounded<const N: usize> {
    fn bounding_box(&self) -> BBox<N>;
}

impl<T, const N: usize> Bounded<N> for &T
where
    T: Bounded<N> + ?Sized,
{
    #[inline(always)]
    fn bounding_box(&self) -> BBox<N> {
        (**self).bounding_box()
    }
}

/// Axis aligned box given by its lowest and highest corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<const N: usize> {
    pub min_corner: na::Point<f32, N>,
    pub max_corner: na::Point<f32, N>,
}

impl<const N: usize> BBox<N> {
    pub fn new(min_corner: na::Point<f32, N>, max_corner: na::Point<f32, N>) -> BBox<N> {
        BBox {
            min_corner,
            max_corner,
        }
    }

    pub fn extents(&self) -> na::SVector<f32, N> {
        self.max_corner - self.min_corner
    }

    pub fn volume(&self) -> f32 {
        self.extents().iter().product()
    }

    /// Length of the diagonal, the largest distance between two points of the box.
    pub fn diagonal(&self) -> f32 {
        self.extents().magnitude()
    }

    /// Whether every side has strictly positive length. NaN sides are not positive.
    pub fn has_positive_extents(&self) -> bool {
        self.extents().iter().all(|&side| side > 0.0)
    }

    pub fn contains_point(&self, p: &na::Point<f32, N>) -> bool {
        itertools::izip!(p.iter(), self.min_corner.iter(), self.max_corner.iter())
            .all(|(&c, &min, &max)| min <= c && c <= max)
    }

    pub fn contains_box(&self, other: &BBox<N>) -> bool {
        self.contains_point(&other.min_corner) && self.contains_point(&other.max_corner)
    }

    /// Uniformly samples a point inside the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> na::Point<f32, N> {
        let rand_vec: na::SVector<f32, N> = rng.gen();
        na::Point::from(self.min_corner.coords + rand_vec.component_mul(&self.extents()))
    }
}

impl<const N: usize> Bounded<N> for BBox<N> {
    fn bounding_box(&self) -> BBox<N> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn bbox(x0: f32, y0: f32, x1: f32, y1: f32) -> BBox<2> {
        BBox::new(na::Point2::new(x0, y0), na::Point2::new(x1, y1))
    }

    #[test]
    fn extents_and_diagonal() {
        let b = bbox(0.0, 0.0, 3.0, 4.0);
        assert_eq!(b.extents(), na::Vector2::new(3.0, 4.0));
        assert_eq!(b.volume(), 12.0);
        assert!((b.diagonal() - 5.0).abs() < 1e-6);
        assert!(b.has_positive_extents());
        assert!(!bbox(0.0, 0.0, 0.0, 4.0).has_positive_extents());
        assert!(!bbox(0.0, 0.0, -1.0, 4.0).has_positive_extents());
    }

    #[test]
    fn containment() {
        let outer = bbox(0.0, 0.0, 50.0, 50.0);
        assert!(outer.contains_box(&bbox(43.0, 47.0, 50.0, 49.0)));
        assert!(!outer.contains_box(&bbox(43.0, 47.0, 51.0, 49.0)));
        assert!(outer.contains_point(&na::Point2::new(0.0, 50.0)));
        assert!(!outer.contains_point(&na::Point2::new(-0.1, 5.0)));
    }

    #[test]
    fn samples_stay_inside() {
        let b = bbox(-2.0, 3.0, 5.0, 4.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(b.contains_point(&b.sample(&mut rng)));
        }
    }
}
