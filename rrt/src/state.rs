//! What the planner needs to know about the states it connects and the world they live in.
//!
//! The planner never looks inside a state. Sampling, measuring and steering are delegated to
//! [`State`], collision checking to [`Environment`] and goal membership to [`Region`].

use std::fmt::Debug;

use rand::Rng;

use crate::bounds::Bounded;

pub trait State: Clone + Debug + Send + Sync {
    /// What states are sampled from.
    type Domain: ?Sized;

    /// Draw a random state from `domain`.
    fn sample<R: Rng + ?Sized>(domain: &Self::Domain, rng: &mut R) -> Self;

    /// A proper metric. It drives steering and is the edge cost of the tree, so the cost of a
    /// node is the length of the path that leads to it.
    fn distance(&self, other: &Self) -> f32;

    /// A cheap value that grows with [`State::distance`]. It is only ever compared against other
    /// comparison costs or against [`State::comparison_threshold`], never summed.
    fn comparison_cost(&self, other: &Self) -> f32;

    /// Translates a radius into the units of [`State::comparison_cost`].
    #[inline]
    fn comparison_threshold(radius: f32) -> f32 {
        radius * radius
    }

    /// Returns `towards` unchanged if it is within `max_step`, otherwise the state reached after
    /// moving exactly `max_step` along the straight line from `self` to `towards`.
    fn steer(&self, towards: &Self, max_step: f32) -> Self;
}

pub trait Environment<S: State, const N: usize>: Bounded<N> {
    fn domain(&self) -> &S::Domain;

    /// Verify if the state is in a valid position.
    fn is_free(&self, state: &S) -> bool;

    /// Whether the straight connection between two states crosses any obstacle.
    fn segment_collides(&self, from: &S, to: &S) -> bool;

    fn max_span(&self) -> f32 {
        self.bounding_box().diagonal()
    }
}

pub trait Region<S, const N: usize>: Bounded<N> {
    fn contains(&self, state: &S) -> bool;
}

impl<S, T, const N: usize> Environment<S, N> for &T
where
    S: State,
    T: Environment<S, N> + ?Sized,
{
    #[inline(always)]
    fn domain(&self) -> &S::Domain {
        (**self).domain()
    }

    #[inline(always)]
    fn is_free(&self, state: &S) -> bool {
        (**self).is_free(state)
    }

    #[inline(always)]
    fn segment_collides(&self, from: &S, to: &S) -> bool {
        (**self).segment_collides(from, to)
    }

    #[inline(always)]
    fn max_span(&self) -> f32 {
        (**self).max_span()
    }
}

impl<S, T, const N: usize> Region<S, N> for &T
where
    T: Region<S, N> + ?Sized,
{
    #[inline(always)]
    fn contains(&self, state: &S) -> bool {
        (**self).contains(state)
    }
}
