//! Grid map model.
//!
//! - [`Point`] and [`Direction`]: integer coordinates and the eight unit
//!   steps, with rotation and angular-difference helpers
//! - [`GridGraph`]: occupancy grid with adjacency built once at load time
//! - [`clearance`]: nearest-obstacle distance map used by obstacle-aware
//!   heuristics

pub mod clearance;
mod graph;
mod point;

pub use graph::GridGraph;
pub use point::{Direction, Point, DIAGONAL_COST, ORTHOGONAL_COST};
