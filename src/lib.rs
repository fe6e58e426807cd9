//! Grid robot path planning with ant colony optimization.
//!
//! Provides pheromone-guided planners for 8-connected occupancy grids:
//!
//! - **Colony engine**: the construct → evaluate → update loop shared by
//!   every single-colony variant, with pluggable construction policies.
//! - **Variants**: Ant System, Ant Colony System, MAACO (modified adaptive),
//!   IHMACO (multi-strategy adaptable) and IAACO (improved adaptive, with
//!   obstacle exclusion).
//! - **Tribes**: MHACO, up to three cooperating colonies with separate
//!   pheromone fields, role rotation and cooperative path refinement.
//! - **Classical baselines**: Dijkstra and A* over the same graph.
//!
//! Paths are ranked by length, with near-equal lengths (within a
//! tolerance) ranked by number of turns. A run that never reaches the goal
//! is not an error: its best path is invalid with infinite length.
//!
//! # Quick start
//!
//! ```
//! use u_antpath::colony::{ColonyConfig, ColonyRunner};
//! use u_antpath::grid::GridGraph;
//! use u_antpath::variants::Ihmaco;
//!
//! let graph = GridGraph::from_ascii(&[
//!     "S....",
//!     "..#..",
//!     ".#...",
//!     "#....",
//!     "....E",
//! ]).unwrap();
//! let config = ColonyConfig::ihmaco().with_seed(7);
//! let result = ColonyRunner::run(&graph, Ihmaco::default(), &config).unwrap();
//! assert!(result.best.valid);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configs, points and results.
//! - `parallel`: rayon-backed tour construction and batch runs.

pub mod classical;
pub mod colony;
pub mod error;
pub mod grid;
pub mod path;
pub mod tribes;
pub mod variants;
