//! Ant Colony System.

use super::deposit_along;
use crate::colony::{ColonyConfig, ConstructionPolicy, IterationOutcome, PheromoneField, StepContext};
use crate::error::ConfigError;
use crate::grid::Point;
use crate::path::Trace;

/// Ant Colony System.
///
/// Differs from [`AntSystem`](super::AntSystem) in three ways:
///
/// - selection is pseudo-random-proportional with threshold `q0`
/// - every traversed edge is immediately pulled toward `t0` with rate
///   `config.rho` (local update), which makes later agents of the same
///   iteration less likely to repeat it
/// - the global update evaporates with [`global_evaporation`](Self::global_evaporation)
///   and deposits `Q / L` on the global best only
///
/// Nothing is deposited until a valid path exists.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntColonySystem {
    /// Evaporation rate of the global update, in (0, 1).
    pub global_evaporation: f64,
}

impl Default for AntColonySystem {
    fn default() -> Self {
        Self {
            global_evaporation: 0.1,
        }
    }
}

impl AntColonySystem {
    pub fn with_global_evaporation(mut self, rate: f64) -> Self {
        self.global_evaporation = rate;
        self
    }
}

impl ConstructionPolicy for AntColonySystem {
    fn name(&self) -> &'static str {
        "ACS"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.global_evaporation > 0.0 && self.global_evaporation < 1.0) {
            return Err(ConfigError::out_of_range(
                "global_evaporation",
                self.global_evaporation,
                "in (0, 1)",
            ));
        }
        Ok(())
    }

    fn heuristic(&self, _ctx: &StepContext<'_>, _r: Point, _s: Point, cost: f64) -> f64 {
        1.0 / cost
    }

    fn uses_local_update(&self) -> bool {
        true
    }

    fn local_update(&self, field: &mut PheromoneField, r: Point, s: Point, config: &ColonyConfig) {
        field.relax_toward(r, s, config.rho, config.t0);
    }

    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>) {
        let best = outcome.best;
        if !best.is_valid() {
            return;
        }
        field.evaporate(self.global_evaporation);
        deposit_along(field, best, outcome.config.deposit / best.length());
    }
}
