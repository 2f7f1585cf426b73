use std::num::NonZeroUsize;
use std::thread;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{ConfigError, Result};
use crate::planner::Planner;
use crate::query::QueryEngine;
use crate::state::{Environment, Region, State};
use crate::utils::*;

pub const DEFAULT_SAMPLES: usize = 1000;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

pub struct PlannerBuilder<S: State, E, G, const N: usize> {
    start: S,
    env: E,
    goal: G,
    samples: usize,
    step_size: Option<f32>,
    radius: Option<f32>,
    partitions: Option<usize>,
    parallel_threshold: usize,
    seed: Option<u64>,
    cost_propagation: bool,
}

impl<S, E, G, const N: usize> PlannerBuilder<S, E, G, N>
where
    S: State,
    E: Environment<S, N>,
    G: Region<S, N>,
{
    pub fn new(start: S, env: E, goal: G) -> PlannerBuilder<S, E, G, N> {
        PlannerBuilder {
            start,
            env,
            goal,
            samples: DEFAULT_SAMPLES,
            step_size: None,
            radius: None,
            partitions: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            seed: None,
            cost_propagation: true,
        }
    }

    /// Total sample budget, the root included. The growth loop runs `samples - 1` times.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.step_size.replace(step_size);
        self
    }

    /// Radius of the neighbourhood searched for cheaper parents and rewiring candidates.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius.replace(radius);
        self
    }

    /// Number of contiguous chunks, and worker threads, used by the parallel queries.
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions.replace(partitions);
        self
    }

    /// Trees with at least this many nodes are queried in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed.replace(seed);
        self
    }

    /// Whether rewiring a node also updates the costs of everything below it.
    pub fn with_cost_propagation(mut self, enabled: bool) -> Self {
        self.cost_propagation = enabled;
        self
    }

    pub fn get_samples(&self) -> usize {
        self.samples
    }

    pub fn get_step_size(&self) -> f32 {
        self.step_size.unwrap_or_else(|| self.env.max_span() / 100.0)
    }

    pub fn get_radius(&self) -> f32 {
        self.radius.unwrap_or_else(|| self.get_step_size() * 2.0)
    }

    /// Defaults to the available parallelism of the machine. The query pool is the only pool the
    /// planner builds, rayon's global pool is left alone.
    pub fn get_partitions(&self) -> usize {
        self.partitions.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_cost_propagation(&self) -> bool {
        self.cost_propagation
    }

    /// Validates the numeric settings and sets up the planner. The environment and goal geometry
    /// is checked later, by [`Planner::initiate`].
    pub fn build(self) -> Result<Planner<S, E, G, N>, ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }

        let step_size = self.get_step_size();
        if !is_positive_finite(step_size) {
            return Err(ConfigError::InvalidParameter {
                name: "step size",
                value: step_size,
            });
        }

        let radius = self.get_radius();
        if !is_positive_finite(radius) {
            return Err(ConfigError::InvalidParameter {
                name: "radius",
                value: radius,
            });
        }

        let partitions = self.get_partitions();
        let queries = QueryEngine::new(partitions, self.parallel_threshold)?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(
            "planner config: samples={} step_size={} radius={} partitions={} parallel_threshold={} seed={:?} cost_propagation={}",
            self.samples,
            step_size,
            radius,
            partitions,
            self.parallel_threshold,
            self.seed,
            self.cost_propagation
        );

        Ok(Planner::new(
            self.start,
            self.env,
            self.goal,
            self.samples,
            step_size,
            self.cost_propagation,
            queries,
            rng,
        ))
    }

    /// Builds the planner and grows the tree with the configured radius.
    pub fn solve(self) -> Result<Planner<S, E, G, N>> {
        let radius = self.get_radius();
        let mut planner = self.build()?;
        planner.initiate(radius)?;
        Ok(planner)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra as na;

    use super::*;
    use crate::bounds::BBox;
    use crate::testing::{bbox, point2, Field};

    fn builder() -> PlannerBuilder<na::Point2<f32>, Field, BBox<2>, 2> {
        PlannerBuilder::new(point2(1.0, 1.0), Field::open(30.0, 40.0), bbox(20.0, 30.0, 25.0, 35.0))
    }

    #[test]
    fn defaults_derive_from_the_environment() {
        let b = builder();
        assert_eq!(b.get_samples(), DEFAULT_SAMPLES);
        assert!((b.get_step_size() - 0.5).abs() < 1e-6);
        assert!((b.get_radius() - 1.0).abs() < 1e-6);
        let expected = thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1);
        assert_eq!(b.get_partitions(), expected);
        assert_eq!(builder().with_partitions(3).get_partitions(), 3);
        assert!(b.get_cost_propagation());
        assert_eq!(b.get_seed(), None);

        let b = b.with_step_size(2.0);
        assert_eq!(b.get_radius(), 4.0);
        assert_eq!(b.with_radius(3.0).get_radius(), 3.0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert_eq!(builder().with_samples(0).build().err(), Some(ConfigError::ZeroSamples));
        assert_eq!(
            builder().with_partitions(0).build().err(),
            Some(ConfigError::ZeroPartitions)
        );
        assert_eq!(
            builder().with_step_size(-1.0).build().err(),
            Some(ConfigError::InvalidParameter {
                name: "step size",
                value: -1.0
            })
        );
        assert!(matches!(
            builder().with_radius(f32::NAN).build().err(),
            Some(ConfigError::InvalidParameter { name: "radius", .. })
        ));
    }

    #[test]
    fn build_seeds_the_tree() {
        let planner = builder()
            .with_partitions(2)
            .with_parallel_threshold(64)
            .with_samples(10)
            .build()
            .unwrap();
        assert_eq!(planner.tree().len(), 1);
        assert_eq!(planner.tree()[0].state(), &point2(1.0, 1.0));
        assert_eq!(planner.queries().partitions(), 2);
        assert_eq!(planner.queries().parallel_threshold(), 64);
        assert_eq!(planner.samples(), 10);
    }
}
