//! Planar world for the `rrt_star` planner: point states, rectangular obstacles and goal
//! regions, a bounded environment and CSV helpers for the results.

pub mod dynamic_point;
pub mod environment;
pub mod io;
pub mod obstacle;
pub mod point;
pub mod segment;

pub use dynamic_point::DynamicPoint;
pub use environment::PlanarEnvironment;
pub use obstacle::Rectangle;
pub use point::{Planar, Point};
pub use segment::Segment;
