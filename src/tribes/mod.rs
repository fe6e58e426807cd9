//! Multi-tribe hybrid ant colony optimization (MHACO).
//!
//! Up to three tribes search the same map, each with its own pheromone
//! field and its own reference path (the tribe's best so far). They
//! cooperate in two ways:
//!
//! - **Roles.** A fixed cycle assigns every iteration a role shared by all
//!   agents: head for the goal, head for an interpolated waypoint on the
//!   reference path, or head for a random one. Each role has its own
//!   `(alpha, beta)`. The heuristic is `a^cos θ` toward the waypoint.
//! - **Refinement.** When an agent steps back onto its tribe's reference
//!   path, the detour it just took is compared against the reference
//!   segment it replaces. A shorter detour inherits that segment's
//!   pheromone; a longer one reinforces the reference.
//!
//! Desirability also carries a correction factor: a penalty for changing
//! heading, a bonus for skipping ahead along the reference path, and, with
//! several tribes, the tribe's own pheromone divided by the rivals' on the
//! same edge. The last term pushes tribes apart onto different corridors.
//!
//! There is no global evaporation; pheromone moves only through the
//! local update toward `t0` and refinement deposits.
//!
//! Agents select moves with the Ant Colony System rule (threshold `q0`).

mod config;
mod runner;

pub use config::{Role, TribeConfig};
pub use runner::{angle_heuristic, TribeColony, TribeReport, TribeResult, TribeRunner};
