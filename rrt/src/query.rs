//! Nearest and near-within-radius scans over the nodes of a search tree.
//!
//! Both queries come in two flavours. The sequential one is a plain scan. The parallel one cuts the
//! node slice into at most `partitions` contiguous chunks, scans each chunk on the query pool and
//! reduces the per-chunk results in chunk order. Ties in the nearest query always go to the node
//! with the lowest index, so both flavours return exactly the same answer.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::ConfigError;
use crate::node::Node;
use crate::state::State;

#[derive(Debug)]
pub struct QueryEngine {
    partitions: usize,
    parallel_threshold: usize,
    pool: Option<ThreadPool>,
}

impl QueryEngine {
    /// A single partition never spawns worker threads.
    pub fn new(partitions: usize, parallel_threshold: usize) -> Result<Self, ConfigError> {
        if partitions == 0 {
            return Err(ConfigError::ZeroPartitions);
        }

        let pool = if partitions > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(partitions)
                .thread_name(|i| format!("rrt-query-{}", i))
                .build()
                .map_err(|err| ConfigError::WorkerPool(err.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(QueryEngine {
            partitions,
            parallel_threshold,
            pool,
        })
    }

    pub fn sequential() -> Self {
        QueryEngine {
            partitions: 1,
            parallel_threshold: usize::MAX,
            pool: None,
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    fn use_parallel(&self, len: usize) -> bool {
        self.pool.is_some() && len >= self.parallel_threshold
    }

    /// Index of the node whose state has the lowest comparison cost to `query`. `None` only for an
    /// empty slice.
    pub fn nearest<S: State>(&self, nodes: &[Node<S>], query: &S) -> Option<usize> {
        if self.use_parallel(nodes.len()) {
            self.nearest_parallel(nodes, query)
        } else {
            self.nearest_sequential(nodes, query)
        }
    }

    /// Indices, in ascending order, of every node within `radius` of `query`.
    pub fn near<S: State>(&self, nodes: &[Node<S>], query: &S, radius: f32) -> Vec<usize> {
        if self.use_parallel(nodes.len()) {
            self.near_parallel(nodes, query, radius)
        } else {
            self.near_sequential(nodes, query, radius)
        }
    }

    pub fn nearest_sequential<S: State>(&self, nodes: &[Node<S>], query: &S) -> Option<usize> {
        nearest_in(nodes, query, 0).map(|(idx, _)| idx)
    }

    pub fn near_sequential<S: State>(&self, nodes: &[Node<S>], query: &S, radius: f32) -> Vec<usize> {
        near_in(nodes, query, S::comparison_threshold(radius), 0)
    }

    /// Falls back to the sequential scan when the engine has no worker pool.
    pub fn nearest_parallel<S: State>(&self, nodes: &[Node<S>], query: &S) -> Option<usize> {
        let pool = match &self.pool {
            Some(pool) => pool,
            None => return self.nearest_sequential(nodes, query),
        };
        let chunk_len = self.chunk_len(nodes.len());

        let per_chunk: Vec<Option<(usize, f32)>> = pool.install(|| {
            nodes
                .par_chunks(chunk_len)
                .enumerate()
                .map(|(chunk, part)| nearest_in(part, query, chunk * chunk_len))
                .collect()
        });

        per_chunk
            .into_iter()
            .flatten()
            .fold(None, |best, candidate| {
                if improves(candidate.1, best) {
                    Some(candidate)
                } else {
                    best
                }
            })
            .map(|(idx, _)| idx)
    }

    /// Falls back to the sequential scan when the engine has no worker pool.
    pub fn near_parallel<S: State>(&self, nodes: &[Node<S>], query: &S, radius: f32) -> Vec<usize> {
        let pool = match &self.pool {
            Some(pool) => pool,
            None => return self.near_sequential(nodes, query, radius),
        };
        let chunk_len = self.chunk_len(nodes.len());
        let threshold = S::comparison_threshold(radius);

        let per_chunk: Vec<Vec<usize>> = pool.install(|| {
            nodes
                .par_chunks(chunk_len)
                .enumerate()
                .map(|(chunk, part)| near_in(part, query, threshold, chunk * chunk_len))
                .collect()
        });

        per_chunk.concat()
    }

    // Ceiling division, so there are never more than `partitions` chunks.
    fn chunk_len(&self, len: usize) -> usize {
        ((len + self.partitions - 1) / self.partitions).max(1)
    }
}

/// A candidate replaces the current best only if it is strictly cheaper. NaN never wins.
#[inline(always)]
fn improves(cost: f32, best: Option<(usize, f32)>) -> bool {
    match best {
        Some((_, best_cost)) => cost < best_cost,
        None => !cost.is_nan(),
    }
}

fn nearest_in<S: State>(nodes: &[Node<S>], query: &S, offset: usize) -> Option<(usize, f32)> {
    let mut best = None;
    for (i, node) in nodes.iter().enumerate() {
        let cost = query.comparison_cost(node.state());
        if improves(cost, best) {
            best = Some((offset + i, cost));
        }
    }
    best
}

fn near_in<S: State>(nodes: &[Node<S>], query: &S, threshold: f32, offset: usize) -> Vec<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| query.comparison_cost(node.state()) <= threshold)
        .map(|(i, _)| offset + i)
        .collect()
}
