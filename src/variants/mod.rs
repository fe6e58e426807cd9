//! Ant colony variants.
//!
//! Each variant is a [`ConstructionPolicy`](crate::colony::ConstructionPolicy)
//! run by the shared [`Colony`](crate::colony::Colony) engine. Pair it with
//! the matching [`ColonyConfig`](crate::colony::ColonyConfig) preset:
//!
//! | Policy | Preset | Heuristic | Update |
//! |---|---|---|---|
//! | [`AntSystem`] | `ant_system()` | `1/cost` | every valid tour deposits `Q/L` |
//! | [`AntColonySystem`] | `acs()` | `1/cost` | local update + elitist deposit on the global best |
//! | [`Maaco`] | `maaco()` | adaptive length/goal blend with turn penalty | q0 schedule + MMAS clamp |
//! | [`Ihmaco`] | `ihmaco()` | `1/d(s, goal)` + direction and best-path bonuses | quadratic q0, fitness-scaled deposit |
//! | [`Iaaco`] | `iaaco()` | decayed distance blend, angle guidance, obstacle exclusion | best/worst rank-based ρ |
//!
//! # References
//!
//! - Dorigo, Birattari & Stützle (2006), "Ant colony optimization"
//! - Dorigo & Gambardella (1997), "Ant colony system: a cooperative
//!   learning approach to the traveling salesman problem"
//! - Wu et al. (2023), "Modified adaptive ant colony optimization algorithm
//!   and its application for solving path planning of mobile robot"
//! - Cui et al. (2024), "Multi-strategy adaptable ant colony optimization
//!   algorithm and its application in robot path planning"
//! - Miao et al. (2021), "Path planning optimization of indoor mobile robot
//!   based on adaptive ant colony algorithm"

mod acs;
mod ant_system;
mod iaaco;
mod ihmaco;
mod maaco;

pub use acs::AntColonySystem;
pub use ant_system::AntSystem;
pub use iaaco::Iaaco;
pub use ihmaco::Ihmaco;
pub use maaco::Maaco;

use crate::colony::PheromoneField;
use crate::grid::Point;
use crate::path::ListPath;

/// Smallest distance used as a divisor.
pub(crate) const MIN_GAP: f64 = 0.01;

/// Euclidean distance, floored at [`MIN_GAP`].
pub(crate) fn gap(a: Point, b: Point) -> f64 {
    a.distance(b).max(MIN_GAP)
}

/// Adds `delta` to every edge of `tour`.
pub(crate) fn deposit_along(field: &mut PheromoneField, tour: &ListPath, delta: f64) {
    for (r, s) in tour.edges() {
        field.add(r, s, delta);
    }
}
