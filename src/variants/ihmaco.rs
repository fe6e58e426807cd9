//! Multi-strategy adaptable ant colony optimization.

use super::{deposit_along, gap};
use crate::colony::{
    ColonyConfig, ConstructionPolicy, IterationOutcome, PheromoneField, Schedule, StepContext,
    TourProgress,
};
use crate::error::{check_positive, check_range, ConfigError};
use crate::grid::{Direction, GridGraph, Point};
use crate::path::Trace;

/// Multi-strategy adaptable ACO.
///
/// Desirability is `τ^α · η^β · ω · T` where `η = 1 / d(s, E)`, `ω`
/// rewards steps aligned with the start→goal bearing
/// (`(5 − Δ) / 15`, `Δ` the 45° steps between the two headings), and `T`
/// doubles the weight of candidates lying on the global best path.
///
/// `q0` follows `0.1 + 2(k − 0.45·nc)² / nc²`. Within an iteration, once
/// more than half the colony has failed to improve the iteration best,
/// every further agent multiplies `q0` by `epsilon_q`.
///
/// The global update adapts `ρ' = ρ(1 + 0.2·k/nc)` and deposits
/// `Q / (w1·L + w2·turns)` on every valid tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ihmaco {
    /// Base of the best-path bonus `T`.
    pub bonus_base: f64,
    /// Length weight of the fitness.
    pub w1: f64,
    /// Turn weight of the fitness.
    pub w2: f64,
    /// Per-agent q0 decay once half the colony has failed.
    pub epsilon_q: f64,
    /// Local update rate toward `t0`.
    pub local_rho: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    q0: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    bearing: Option<Direction>,
}

impl Default for Ihmaco {
    fn default() -> Self {
        Self {
            bonus_base: 1.0,
            w1: 0.5,
            w2: 1.0,
            epsilon_q: 0.1,
            local_rho: 0.1,
            q0: 0.0,
            bearing: None,
        }
    }
}

impl Ihmaco {
    pub fn with_fitness_weights(mut self, w1: f64, w2: f64) -> Self {
        self.w1 = w1;
        self.w2 = w2;
        self
    }

    pub fn with_epsilon_q(mut self, epsilon_q: f64) -> Self {
        self.epsilon_q = epsilon_q;
        self
    }

    pub fn with_local_rho(mut self, rho: f64) -> Self {
        self.local_rho = rho;
        self
    }

    /// Scheduled q0 for iteration `number` (1-based), before per-agent decay.
    pub fn q0_at(number: usize, max_iterations: usize) -> f64 {
        let nc = max_iterations as f64;
        let offset = number as f64 - 0.45 * nc;
        (0.1 + 2.0 * offset * offset / (nc * nc)).clamp(0.0, 1.0)
    }

    /// Current exploitation threshold.
    pub fn q0(&self) -> f64 {
        self.q0
    }

    /// Weighted length and turn count; lower is fitter.
    pub fn fitness<T: Trace + ?Sized>(&self, path: &T) -> f64 {
        self.w1 * path.length() + self.w2 * path.turn_num() as f64
    }

    fn alignment(&self, r: Point, s: Point) -> f64 {
        match (self.bearing, r.direction_to(s)) {
            (Some(bearing), Some(step)) => f64::from(5 - bearing.turn_steps(step)) / 15.0,
            _ => 1.0 / 3.0,
        }
    }
}

impl ConstructionPolicy for Ihmaco {
    fn name(&self) -> &'static str {
        "IHMACO"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("bonus_base", self.bonus_base)?;
        check_range("w1", self.w1, 0.0, f64::MAX, "non-negative")?;
        check_range("w2", self.w2, 0.0, f64::MAX, "non-negative")?;
        if self.w1 + self.w2 <= 0.0 {
            return Err(ConfigError::out_of_range("w1 + w2", self.w1 + self.w2, "positive"));
        }
        check_range("epsilon_q", self.epsilon_q, 0.0, 1.0, "in [0, 1]")?;
        if !(self.local_rho > 0.0 && self.local_rho < 1.0) {
            return Err(ConfigError::out_of_range("local_rho", self.local_rho, "in (0, 1)"));
        }
        Ok(())
    }

    fn prepare(&mut self, graph: &GridGraph, _config: &ColonyConfig) {
        self.bearing = graph.start().direction_to(graph.end());
    }

    fn init_pheromone(&self, graph: &GridGraph, config: &ColonyConfig) -> PheromoneField {
        let (start, end) = (graph.start(), graph.end());
        let span = gap(start, end);
        PheromoneField::from_fn(graph, |i, j, _| {
            let a = if gap(i, end) > gap(j, end) { 1.0 } else { 0.5 };
            let through_i = span / (gap(start, i) + gap(i, end));
            let through_j = span / (gap(start, j) + gap(j, end));
            a * (through_i + through_j) * config.t0
        })
    }

    fn begin_iteration(&mut self, schedule: Schedule, _config: &ColonyConfig) {
        self.q0 = Self::q0_at(schedule.number(), schedule.max_iterations);
    }

    fn before_tour(&mut self, progress: TourProgress, config: &ColonyConfig) {
        if progress.failures as f64 > 0.5 * config.ants as f64 {
            self.q0 *= self.epsilon_q;
        }
    }

    fn exploitation(&self, _ctx: &StepContext<'_>) -> f64 {
        self.q0
    }

    fn heuristic(&self, ctx: &StepContext<'_>, _r: Point, s: Point, _cost: f64) -> f64 {
        1.0 / gap(s, ctx.graph.end())
    }

    fn desirability(&self, ctx: &StepContext<'_>, r: Point, s: Point, cost: f64) -> f64 {
        let tau = ctx.pheromone.get(r, s);
        let eta = self.heuristic(ctx, r, s, cost);
        let bonus = if ctx.best.contains(s) {
            2.0 * self.bonus_base
        } else {
            self.bonus_base
        };
        tau.powf(ctx.config.alpha) * eta.powf(ctx.config.beta) * self.alignment(r, s) * bonus
    }

    fn uses_local_update(&self) -> bool {
        true
    }

    fn local_update(&self, field: &mut PheromoneField, r: Point, s: Point, config: &ColonyConfig) {
        field.relax_toward(r, s, self.local_rho, config.t0);
    }

    fn parallel_safe(&self) -> bool {
        false
    }

    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>) {
        let config = outcome.config;
        let k = outcome.schedule.number() as f64;
        let nc = outcome.schedule.max_iterations as f64;
        let rho = (config.rho * (1.0 + 0.2 * k / nc)).min(0.99);
        field.evaporate(rho);
        for tour in outcome.valid_tours() {
            let fitness = self.fitness(tour).max(super::MIN_GAP);
            deposit_along(field, tour, config.deposit / fitness);
        }
    }
}
