//! Strategy trait implemented by every single-colony variant.

use super::config::ColonyConfig;
use super::pheromone::PheromoneField;
use super::select::pseudo_random_proportional;
use crate::error::ConfigError;
use crate::grid::{GridGraph, Point};
use crate::path::{ListPath, Trace};
use rand::Rng;

/// Position of the running iteration within the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Iterations completed before this one.
    pub index: usize,
    /// Iteration budget `nc`.
    pub max_iterations: usize,
}

impl Schedule {
    /// 1-based number of the running iteration.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// `index / nc`, in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.index as f64 / self.max_iterations.max(1) as f64
    }
}

/// Everything a policy can read while an agent picks its next step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub graph: &'a GridGraph,
    pub pheromone: &'a PheromoneField,
    pub config: &'a ColonyConfig,
    pub schedule: Schedule,
    /// The agent's tour so far; its last point is the current position.
    pub path: &'a ListPath,
    /// Global best so far (the unreached sentinel before the first success).
    pub best: &'a ListPath,
}

/// Bookkeeping handed to [`ConstructionPolicy::before_tour`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourProgress {
    /// 0-based agent number within the iteration.
    pub agent: usize,
    /// Earlier agents of this iteration whose tour did not improve the
    /// iteration best (abandoned tours included).
    pub failures: usize,
}

/// Completed iteration, as seen by the global update.
#[derive(Debug, Clone, Copy)]
pub struct IterationOutcome<'a> {
    pub graph: &'a GridGraph,
    pub config: &'a ColonyConfig,
    pub schedule: Schedule,
    /// Every tour of the iteration, abandoned ones included.
    pub tours: &'a [ListPath],
    /// Index into `tours` of the iteration best, if any tour succeeded.
    pub iteration_best: Option<usize>,
    /// Global best after this iteration's comparison.
    pub best: &'a ListPath,
}

impl<'a> IterationOutcome<'a> {
    /// Tours that reached the goal.
    pub fn valid_tours(&self) -> impl Iterator<Item = &'a ListPath> + 'a {
        self.tours.iter().filter(|t| t.is_valid())
    }
}

/// Variant-specific behavior plugged into the shared colony loop.
///
/// The [`Colony`](super::Colony) engine owns the iteration structure:
/// tour construction, best tracking, history. A policy supplies the
/// pieces that differ between variants. Only [`name`](Self::name),
/// [`heuristic`](Self::heuristic) and
/// [`global_update`](Self::global_update) are mandatory; the defaults give
/// the classic Ant System behavior.
///
/// Methods taking `&mut self` run between tours or iterations and may
/// adapt internal state (schedules, thresholds). Methods taking `&self`
/// run during construction.
pub trait ConstructionPolicy: Send + Sync {
    /// Short variant name used in logs and results.
    fn name(&self) -> &'static str;

    /// Validates variant-specific parameters.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// One-time precomputation over the loaded graph.
    fn prepare(&mut self, _graph: &GridGraph, _config: &ColonyConfig) {}

    /// Initial pheromone field.
    fn init_pheromone(&self, graph: &GridGraph, config: &ColonyConfig) -> PheromoneField {
        PheromoneField::uniform(graph, config.t0)
    }

    /// Called once before the first tour of every iteration.
    fn begin_iteration(&mut self, _schedule: Schedule, _config: &ColonyConfig) {}

    /// Called before each agent's tour.
    fn before_tour(&mut self, _progress: TourProgress, _config: &ColonyConfig) {}

    /// Exploitation threshold `q0` for the current step.
    fn exploitation(&self, ctx: &StepContext<'_>) -> f64 {
        ctx.config.q0
    }

    /// Heuristic desirability of `r → s`, ignoring pheromone.
    fn heuristic(&self, ctx: &StepContext<'_>, r: Point, s: Point, cost: f64) -> f64;

    /// Combined weight `τ^α · η^β` (plus variant modifiers).
    fn desirability(&self, ctx: &StepContext<'_>, r: Point, s: Point, cost: f64) -> f64 {
        let tau = ctx.pheromone.get(r, s);
        let eta = self.heuristic(ctx, r, s, cost);
        tau.powf(ctx.config.alpha) * eta.powf(ctx.config.beta)
    }

    /// Candidate moves from `r`: neighbors not yet on the agent's tour.
    fn allowed_moves(&self, ctx: &StepContext<'_>, r: Point) -> Vec<(Point, f64)> {
        ctx.graph
            .neighbors(r)
            .iter()
            .copied()
            .filter(|&(s, _)| !ctx.path.contains(s))
            .collect()
    }

    /// Picks the next point with the pseudo-random-proportional rule.
    /// `None` means the agent is stuck.
    fn select_next<R: Rng + ?Sized>(&self, ctx: &StepContext<'_>, rng: &mut R) -> Option<Point>
    where
        Self: Sized,
    {
        let r = ctx.path.last()?;
        let weighted: Vec<(Point, f64)> = self
            .allowed_moves(ctx, r)
            .into_iter()
            .map(|(s, cost)| (s, self.desirability(ctx, r, s, cost)))
            .collect();
        pseudo_random_proportional(&weighted, self.exploitation(ctx), rng)
    }

    /// Whether [`local_update`](Self::local_update) does anything.
    fn uses_local_update(&self) -> bool {
        false
    }

    /// Intra-iteration update right after an agent traverses `r → s`.
    fn local_update(&self, _field: &mut PheromoneField, _r: Point, _s: Point, _config: &ColonyConfig) {}

    /// Whether tours of one iteration may be built concurrently. False
    /// for policies with local updates or per-agent adaptation.
    fn parallel_safe(&self) -> bool {
        !self.uses_local_update()
    }

    /// End-of-iteration evaporation and deposit. Runs exactly once per
    /// iteration, after every tour is complete.
    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule() {
        let s = Schedule {
            index: 3,
            max_iterations: 12,
        };
        assert_eq!(s.number(), 4);
        assert!((s.fraction() - 0.25).abs() < 1e-12);
    }
}
