use log::{debug, info, trace, warn};
use rand::rngs::StdRng;

use crate::error::{ConfigError, PlanError, Result};
use crate::node::Node;
use crate::path::Path;
use crate::query::QueryEngine;
use crate::state::{Environment, Region, State};
use crate::tree::SearchTree;
use crate::utils::*;

/// Counters of the last planning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Calls to `extend` made by the growth loop.
    pub iterations: usize,
    /// Extensions that added a node.
    pub extended: usize,
    /// Existing nodes that were moved under a newly added node.
    pub rewired: usize,
    pub goal_nodes: usize,
}

/// RRT* planner. Built through [`PlannerBuilder`](crate::PlannerBuilder).
///
/// The tree is only touched through `&mut self`, after every spatial query of the current step has
/// returned. Queries borrow the node slice immutably, so a parallel scan can never observe a
/// half-applied rewiring.
pub struct Planner<S: State, E, G, const N: usize> {
    env: E,
    goal: G,
    start: S,
    samples: usize,
    step_size: f32,
    cost_propagation: bool,
    tree: SearchTree<S>,
    queries: QueryEngine,
    rng: StdRng,
    summary: Summary,
}

impl<S, E, G, const N: usize> Planner<S, E, G, N>
where
    S: State,
    E: Environment<S, N>,
    G: Region<S, N>,
{
    pub(crate) fn new(
        start: S,
        env: E,
        goal: G,
        samples: usize,
        step_size: f32,
        cost_propagation: bool,
        queries: QueryEngine,
        rng: StdRng,
    ) -> Self {
        let mut tree = SearchTree::with_capacity(samples);
        tree.reset(start.clone());

        Planner {
            env,
            goal,
            start,
            samples,
            step_size,
            cost_propagation,
            tree,
            queries,
            rng,
            summary: Summary::default(),
        }
    }

    /// Checks that the environment and the goal region have positive extents and that the goal
    /// lies inside the environment.
    pub fn validate_geometry(&self) -> Result<(), ConfigError> {
        let bounds = self.env.bounding_box();
        if !bounds.has_positive_extents() {
            return Err(ConfigError::EnvironmentExtents {
                extents: bounds.extents().iter().copied().collect(),
            });
        }

        let goal = self.goal.bounding_box();
        if !goal.has_positive_extents() {
            return Err(ConfigError::GoalExtents {
                extents: goal.extents().iter().copied().collect(),
            });
        }

        if !bounds.contains_box(&goal) {
            return Err(ConfigError::GoalOutsideEnvironment);
        }

        Ok(())
    }

    /// Seeds the tree with the start state and calls [`Planner::extend`] `samples - 1` times,
    /// recording every new node that lands in the goal region. Any previous tree is discarded.
    pub fn initiate(&mut self, radius: f32) -> Result<Summary> {
        check_radius(radius)?;
        self.validate_geometry()?;

        if !self.env.is_free(&self.start) {
            warn!("start state {:?} is not obstacle free, the tree cannot grow", self.start);
        }

        self.tree.reset(self.start.clone());
        self.summary = Summary::default();

        info!(
            "growing RRT* tree: {} samples, step size {}, radius {}",
            self.samples, self.step_size, radius
        );

        for _ in 1..self.samples {
            self.summary.iterations += 1;
            if let Some(idx) = self.grow(radius) {
                if self.goal.contains(self.tree[idx].state()) {
                    trace!("node {} reached the goal with cost {}", idx, self.tree[idx].cost());
                    self.tree.add_goal(idx);
                }
            }
        }

        self.summary.goal_nodes = self.tree.goal_nodes().len();
        info!(
            "tree grown: {} nodes after {} iterations, {} rewirings, {} goal nodes",
            self.tree.len(),
            self.summary.iterations,
            self.summary.rewired,
            self.summary.goal_nodes
        );

        Ok(self.summary)
    }

    /// Attempts to grow the tree by one node. Returns the index of the new node, or `None` when
    /// the steered state cannot be reached from its nearest node without a collision. A failed
    /// extension leaves the tree untouched.
    pub fn extend(&mut self, radius: f32) -> Result<Option<usize>, ConfigError> {
        check_radius(radius)?;
        Ok(self.grow(radius))
    }

    // `radius` has already been checked.
    fn grow(&mut self, radius: f32) -> Option<usize> {
        let sample = S::sample(self.env.domain(), &mut self.rng);

        let nearest_idx = self.queries.nearest(self.tree.nodes(), &sample)?;
        let nearest = &self.tree[nearest_idx];
        let new_state = nearest.state().steer(&sample, self.step_size);

        if !self.collision_free(nearest.state(), &new_state) {
            trace!("extension from node {} towards {:?} blocked", nearest_idx, sample);
            return None;
        }

        let near = self.queries.near(self.tree.nodes(), &new_state, radius);

        // Going through the nearest node is the fallback, any collision free neighbour that is
        // strictly cheaper replaces it.
        let mut parent = nearest_idx;
        let mut cost = nearest.cost() + nearest.state().distance(&new_state);
        for &candidate in &near {
            if candidate == nearest_idx {
                continue;
            }
            let node = &self.tree[candidate];
            let via = node.cost() + node.state().distance(&new_state);
            if via < cost && self.collision_free(node.state(), &new_state) {
                parent = candidate;
                cost = via;
            }
        }

        let new_idx = self.tree.add_node(Node::new(new_state, cost, parent));
        let rewired = self.rewire(new_idx, parent, &near);

        self.summary.extended += 1;
        self.summary.rewired += rewired;
        trace!(
            "added node {} under {} with cost {} ({} near, {} rewired)",
            new_idx,
            parent,
            cost,
            near.len(),
            rewired
        );

        Some(new_idx)
    }

    /// Moves every neighbour that becomes strictly cheaper through `new_idx` under it.
    ///
    /// The decision for each neighbour is made in full before the tree is touched. A neighbour that
    /// is an ancestor of the new node is never moved, even if rounding makes it look cheaper, since
    /// that would close a cycle.
    ///
    /// With cost propagation enabled the descendants of a moved neighbour are updated as well.
    /// Without it they keep the cost they had through the old parent, which is faster but leaves
    /// stale, too high costs below every rewired node.
    fn rewire(&mut self, new_idx: usize, parent: usize, near: &[usize]) -> usize {
        let mut rewired = 0;

        for &neighbor_idx in near {
            if neighbor_idx == parent {
                continue;
            }

            let new_node = &self.tree[new_idx];
            let neighbor = &self.tree[neighbor_idx];
            let cost = new_node.cost() + new_node.state().distance(neighbor.state());

            if cost < neighbor.cost()
                && !self.tree.is_ancestor(neighbor_idx, new_idx)
                && self.collision_free(new_node.state(), neighbor.state())
            {
                self.tree.reparent(neighbor_idx, new_idx, cost);
                if self.cost_propagation {
                    self.tree.propagate_cost_update(neighbor_idx);
                }
                rewired += 1;
            }
        }

        rewired
    }

    fn collision_free(&self, from: &S, to: &S) -> bool {
        self.env.is_free(from) && self.env.is_free(to) && !self.env.segment_collides(from, to)
    }

    /// Path from the root to the cheapest goal node. Ties go to the goal node found first.
    pub fn best_path(&self) -> Result<Path<S>> {
        let best = self
            .tree
            .goal_nodes()
            .iter()
            .copied()
            .min_by_key(|&idx| self.tree[idx].cost().to_ord())
            .ok_or(PlanError::NoGoalReached)?;

        let path = Path::from_tree(&self.tree, best)?;
        debug!(
            "best path ends at node {} with cost {} over {} waypoints",
            best,
            path.cost,
            path.len()
        );
        Ok(path)
    }

    /// Goal nodes in discovery order with their current cost.
    pub fn goal_nodes(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.tree
            .goal_nodes()
            .iter()
            .map(move |&idx| (idx, self.tree[idx].cost()))
    }

    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn goal(&self) -> &G {
        &self.goal
    }

    pub fn start(&self) -> &S {
        &self.start
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    pub fn queries(&self) -> &QueryEngine {
        &self.queries
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}

fn check_radius(radius: f32) -> Result<(), ConfigError> {
    if is_positive_finite(radius) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "radius",
            value: radius,
        })
    }
}
