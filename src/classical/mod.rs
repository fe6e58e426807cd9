//! Exact shortest-path baselines.
//!
//! Both searches run over the same [`GridGraph`](crate::grid::GridGraph)
//! adjacency as the colonies and minimize length only, ignoring turns.
//! They serve as optimality references for the stochastic planners.

mod search;

pub use search::{a_star, dijkstra};
