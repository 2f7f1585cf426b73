use thiserror::Error;

pub type Result<T, E = PlanError> = std::result::Result<T, E>;

/// Problems with the planner setup. All of them are reported before any sampling happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, but was {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("the sample budget must be at least 1")]
    ZeroSamples,

    #[error("the partition count must be at least 1")]
    ZeroPartitions,

    #[error("environment extents must be strictly positive, got {extents:?}")]
    EnvironmentExtents { extents: Vec<f32> },

    #[error("goal region extents must be strictly positive, got {extents:?}")]
    GoalExtents { extents: Vec<f32> },

    #[error("the goal region is not contained in the environment")]
    GoalOutsideEnvironment,

    #[error("could not build the query worker pool: {0}")]
    WorkerPool(String),
}

/// Broken structural invariants of a search tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("the tree has no root")]
    Empty,

    #[error("the root has cost {cost}, expected 0")]
    RootCost { cost: f32 },

    #[error("node {node} has no parent but is not the root")]
    SecondRoot { node: usize },

    #[error("node {node} points to parent {parent}, which is not in the tree")]
    DanglingParent { node: usize, parent: usize },

    #[error("node {node} is not listed among the children of its parent {parent}")]
    MissingChild { node: usize, parent: usize },

    #[error("node {node} has cost {actual}, but its parent implies {expected}")]
    InconsistentCost {
        node: usize,
        expected: f32,
        actual: f32,
    },

    #[error("parent links starting at node {node} never reach the root")]
    Cycle { node: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no node reached the goal region")]
    NoGoalReached,

    #[error(transparent)]
    Tree(#[from] TreeError),
}
