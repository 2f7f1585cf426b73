//! Sampling based motion planning with RRT*.
//!
//! The planner is generic over the state it plans for. A state type implements [`State`], the
//! world it moves in implements [`Environment`] and the goal implements [`Region`]. Everything
//! is configured through [`PlannerBuilder`].

pub mod bounds;
pub mod builder;
pub mod error;
pub mod node;
pub mod path;
pub mod planner;
pub mod query;
pub mod state;
pub mod tree;

mod utils;

#[cfg(test)]
mod testing;

pub use bounds::{BBox, Bounded};
pub use builder::PlannerBuilder;
pub use error::{ConfigError, PlanError, Result, TreeError};
pub use node::Node;
pub use path::Path;
pub use planner::{Planner, Summary};
pub use query::QueryEngine;
pub use state::{Environment, Region, State};
pub use tree::SearchTree;
pub use utils::OrdF32;
