//! Single-colony engine shared by every ant colony variant.
//!
//! The engine owns the iteration structure; a [`ConstructionPolicy`]
//! supplies what differs between variants (initial pheromone, heuristic,
//! move restriction, local and global updates).
//!
//! # Iteration
//!
//! 1. Each of the `m` agents builds a tour from start to goal with the
//!    pseudo-random-proportional rule. A dead end abandons the tour.
//! 2. The iteration best among valid tours is compared against the
//!    global best with [`PathOrder`](crate::path::PathOrder).
//! 3. The policy's global update runs exactly once.
//! 4. The global-best length is appended to the convergence history.
//!
//! # Examples
//!
//! ```
//! use u_antpath::colony::{Colony, ColonyConfig};
//! use u_antpath::grid::GridGraph;
//! use u_antpath::variants::Maaco;
//!
//! let graph = GridGraph::from_ascii(&["S..#", "..#.", "...E"]).unwrap();
//! let config = ColonyConfig::maaco().with_max_iterations(10).with_seed(3);
//! let mut colony = Colony::new(&graph, Maaco::default(), config).unwrap();
//! while let Some(report) = colony.step() {
//!     println!("{} -> {}", report.iteration, report.best.length);
//! }
//! ```

mod config;
mod pheromone;
mod runner;
mod select;
mod types;

pub use config::ColonyConfig;
pub use pheromone::PheromoneField;
pub use runner::{Colony, ColonyResult, ColonyRunner, IterationReport};
pub use select::pseudo_random_proportional;
pub use types::{ConstructionPolicy, IterationOutcome, Schedule, StepContext, TourProgress};
