//! Colony execution loop.
//!
//! [`Colony`] is the steppable engine: one call to [`Colony::step`] runs a
//! full iteration (construction → iteration best → global update).
//! [`ColonyRunner`] drives it to the end of the budget and packages a
//! [`ColonyResult`].

use super::config::ColonyConfig;
use super::pheromone::PheromoneField;
use super::types::{ConstructionPolicy, IterationOutcome, Schedule, StepContext, TourProgress};
use crate::error::ColonyError;
use crate::grid::{GridGraph, Point};
use crate::path::{ListPath, PathOrder, PathSnapshot, Trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

/// Result of a colony run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonyResult {
    /// Global best path. Invalid with infinite length if the goal was
    /// never reached.
    pub best: PathSnapshot,

    /// Iterations executed (0 when start equals end).
    pub iterations: usize,

    /// Shortest global-best length reached after each iteration.
    pub history: Vec<f64>,

    /// Iteration number at which `history` last changed (0 if never).
    pub converged_at: usize,

    /// Variant name.
    pub variant: String,
}

/// Summary handed out after every iteration in real-time mode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationReport {
    /// 1-based number of the iteration just completed.
    pub iteration: usize,
    /// Global best after the iteration.
    pub best: PathSnapshot,
    /// Length of this iteration's best tour, if any tour succeeded.
    pub iteration_best_length: Option<f64>,
    /// Tours that reached the goal this iteration.
    pub valid_tours: usize,
}

/// Steppable single-colony engine.
///
/// The graph is borrowed read-only for the engine's lifetime; the
/// pheromone field is owned exclusively.
pub struct Colony<'g, P: ConstructionPolicy> {
    graph: &'g GridGraph,
    policy: P,
    config: ColonyConfig,
    order: PathOrder,
    pheromone: PheromoneField,
    rng: StdRng,
    iteration: usize,
    best: ListPath,
    history: Vec<f64>,
    converged_at: usize,
    trivial: bool,
    warned: bool,
}

impl<'g, P: ConstructionPolicy> Colony<'g, P> {
    /// Validates the configuration and the policy, then initializes the
    /// pheromone field.
    pub fn new(graph: &'g GridGraph, mut policy: P, config: ColonyConfig) -> Result<Self, ColonyError> {
        config.validate()?;
        policy.validate()?;

        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let trivial = graph.start() == graph.end();
        let best = if trivial {
            ListPath::from_points([graph.start()])
        } else {
            ListPath::unreached()
        };

        policy.prepare(graph, &config);
        let pheromone = policy.init_pheromone(graph, &config);

        Ok(Self {
            graph,
            policy,
            order: config.path_order(),
            pheromone,
            rng,
            iteration: 0,
            best,
            history: Vec::with_capacity(config.max_iterations),
            converged_at: 0,
            trivial,
            warned: false,
            config,
        })
    }

    /// True once the budget is spent, or immediately when start equals end.
    pub fn is_end(&self) -> bool {
        self.trivial || self.iteration >= self.config.max_iterations
    }

    /// Runs one iteration. Returns `None` once the run has ended.
    pub fn step(&mut self) -> Option<IterationReport> {
        if self.is_end() {
            return None;
        }
        let schedule = Schedule {
            index: self.iteration,
            max_iterations: self.config.max_iterations,
        };
        self.policy.begin_iteration(schedule, &self.config);

        let tours = self.construct_tours(schedule);
        let valid_tours = tours.iter().filter(|t| t.is_valid()).count();
        let iteration_best = self.order.best_index(&tours);
        if let Some(i) = iteration_best {
            if self.order.is_better(&tours[i], &self.best) {
                self.best = tours[i].clone();
            }
        }

        let outcome = IterationOutcome {
            graph: self.graph,
            config: &self.config,
            schedule,
            tours: &tours,
            iteration_best,
            best: &self.best,
        };
        self.policy.global_update(&mut self.pheromone, &outcome);
        self.iteration += 1;

        let reached = self.history.last().map_or(self.best.length(), |&h| h.min(self.best.length()));
        if self.history.last().is_none_or(|&h| reached < h) && reached.is_finite() {
            self.converged_at = self.iteration;
        }
        self.history.push(reached);

        if valid_tours == 0 && !self.warned {
            warn!(
                variant = self.policy.name(),
                iteration = self.iteration,
                "no agent reached the goal this iteration"
            );
            self.warned = true;
        }
        debug!(
            variant = self.policy.name(),
            iteration = self.iteration,
            best_length = self.best.length(),
            best_turns = self.best.turn_num(),
            valid_tours,
            "iteration complete"
        );

        Some(IterationReport {
            iteration: self.iteration,
            best: self.best.snapshot(),
            iteration_best_length: iteration_best.map(|i| tours[i].length()),
            valid_tours,
        })
    }

    fn construct_tours(&mut self, schedule: Schedule) -> Vec<ListPath> {
        #[cfg(feature = "parallel")]
        if self.config.parallel && self.policy.parallel_safe() {
            return self.construct_parallel(schedule);
        }
        self.construct_sequential(schedule)
    }

    /// Agents one at a time; local updates are visible to later agents.
    fn construct_sequential(&mut self, schedule: Schedule) -> Vec<ListPath> {
        let mut tours: Vec<ListPath> = Vec::with_capacity(self.config.ants);
        let mut leader: Option<usize> = None;
        let mut failures = 0;

        for agent in 0..self.config.ants {
            self.policy.before_tour(TourProgress { agent, failures }, &self.config);
            let env = TourEnv {
                graph: self.graph,
                config: &self.config,
                schedule,
                best: &self.best,
            };
            let tour = construct_tour(&self.policy, &env, &mut self.pheromone, &mut self.rng);

            if !tour.is_valid() {
                trace!(agent, steps = tour.len(), "tour abandoned at a dead end");
            }
            let improved =
                tour.is_valid() && leader.is_none_or(|b| self.order.is_better(&tour, &tours[b]));
            if improved {
                leader = Some(tours.len());
            } else {
                failures += 1;
            }
            tours.push(tour);
        }
        tours
    }

    /// Agents concurrently against a read-only field, one RNG each.
    #[cfg(feature = "parallel")]
    fn construct_parallel(&mut self, schedule: Schedule) -> Vec<ListPath> {
        use rayon::prelude::*;

        let seeds: Vec<u64> = (0..self.config.ants).map(|_| self.rng.random()).collect();
        let env = TourEnv {
            graph: self.graph,
            config: &self.config,
            schedule,
            best: &self.best,
        };
        let policy = &self.policy;
        let field = &self.pheromone;
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                construct_tour(policy, &env, field, &mut rng)
            })
            .collect()
    }

    pub fn graph(&self) -> &'g GridGraph {
        self.graph
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn pheromone(&self) -> &PheromoneField {
        &self.pheromone
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn best(&self) -> &ListPath {
        &self.best
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn converged_at(&self) -> usize {
        self.converged_at
    }

    /// Packages the current state as a result.
    pub fn into_result(self) -> ColonyResult {
        ColonyResult {
            best: self.best.snapshot(),
            iterations: self.iteration,
            history: self.history,
            converged_at: self.converged_at,
            variant: self.policy.name().to_string(),
        }
    }
}

/// Read-only surroundings of one tour.
struct TourEnv<'a> {
    graph: &'a GridGraph,
    config: &'a ColonyConfig,
    schedule: Schedule,
    best: &'a ListPath,
}

/// Pheromone access during construction: exclusive access applies local
/// updates, shared access skips them.
trait FieldAccess {
    fn field(&self) -> &PheromoneField;
    fn after_step<P: ConstructionPolicy>(&mut self, policy: &P, r: Point, s: Point, config: &ColonyConfig);
}

impl FieldAccess for &mut PheromoneField {
    fn field(&self) -> &PheromoneField {
        self
    }

    fn after_step<P: ConstructionPolicy>(&mut self, policy: &P, r: Point, s: Point, config: &ColonyConfig) {
        if policy.uses_local_update() {
            policy.local_update(&mut **self, r, s, config);
        }
    }
}

impl FieldAccess for &PheromoneField {
    fn field(&self) -> &PheromoneField {
        self
    }

    fn after_step<P: ConstructionPolicy>(&mut self, _: &P, _: Point, _: Point, _: &ColonyConfig) {}
}

/// Walks one agent from start to goal. A dead end invalidates the tour.
fn construct_tour<P, F, R>(policy: &P, env: &TourEnv<'_>, mut field: F, rng: &mut R) -> ListPath
where
    P: ConstructionPolicy,
    F: FieldAccess,
    R: Rng + ?Sized,
{
    let end = env.graph.end();
    let mut r = env.graph.start();
    let mut path = ListPath::new();
    path.push(r);

    while r != end {
        let next = {
            let ctx = StepContext {
                graph: env.graph,
                pheromone: field.field(),
                config: env.config,
                schedule: env.schedule,
                path: &path,
                best: env.best,
            };
            policy.select_next(&ctx, rng)
        };
        let Some(s) = next else {
            path.invalidate();
            break;
        };
        path.push(s);
        field.after_step(policy, r, s, env.config);
        r = s;
    }
    path
}

/// Runs colonies to completion.
///
/// ```
/// use u_antpath::colony::{ColonyConfig, ColonyRunner};
/// use u_antpath::grid::GridGraph;
/// use u_antpath::variants::AntColonySystem;
///
/// let graph = GridGraph::from_ascii(&["S...", "....", "...E"]).unwrap();
/// let config = ColonyConfig::acs().with_ants(10).with_max_iterations(5).with_seed(1);
/// let result = ColonyRunner::run(&graph, AntColonySystem::default(), &config).unwrap();
/// assert!(result.best.valid);
/// ```
pub struct ColonyRunner;

impl ColonyRunner {
    /// Runs the full iteration budget.
    pub fn run<P: ConstructionPolicy>(
        graph: &GridGraph,
        policy: P,
        config: &ColonyConfig,
    ) -> Result<ColonyResult, ColonyError> {
        Self::run_with_observer(graph, policy, config, |_| {})
    }

    /// Runs the full budget, calling `observer` after every iteration.
    pub fn run_with_observer<P, F>(
        graph: &GridGraph,
        policy: P,
        config: &ColonyConfig,
        mut observer: F,
    ) -> Result<ColonyResult, ColonyError>
    where
        P: ConstructionPolicy,
        F: FnMut(&IterationReport),
    {
        let mut colony = Colony::new(graph, policy, config.clone())?;
        while let Some(report) = colony.step() {
            observer(&report);
        }
        let result = colony.into_result();
        info!(
            variant = %result.variant,
            iterations = result.iterations,
            best_length = result.best.length,
            best_turns = result.best.turn_num,
            converged_at = result.converged_at,
            "colony run finished"
        );
        Ok(result)
    }

    /// Independent repeated runs for batch statistics.
    ///
    /// Run `i` uses seed `base + i`, where `base` is the configured seed
    /// (or a random one). With the `parallel` feature the runs execute as
    /// independent rayon tasks.
    pub fn run_many<P>(
        graph: &GridGraph,
        policy: &P,
        config: &ColonyConfig,
        runs: usize,
    ) -> Result<Vec<ColonyResult>, ColonyError>
    where
        P: ConstructionPolicy + Clone,
    {
        config.validate()?;
        policy.validate()?;
        let base = config.seed.unwrap_or_else(rand::random);
        let one = |i: usize| {
            let seeded = config.clone().with_seed(base.wrapping_add(i as u64));
            Self::run(graph, policy.clone(), &seeded)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..runs).into_par_iter().map(one).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..runs).map(one).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::variants::{AntColonySystem, AntSystem};

    fn open() -> GridGraph {
        GridGraph::open(5, 5, Point::new(0, 0), Point::new(4, 4)).unwrap()
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let g = open();
        let config = ColonyConfig::ant_system().with_ants(0);
        let err = ColonyRunner::run(&g, AntSystem, &config).unwrap_err();
        assert_eq!(err, ColonyError::InvalidConfig(ConfigError::ZeroCount("ants")));
    }

    #[test]
    fn test_start_equals_end_returns_immediately() {
        let g = GridGraph::open(3, 3, Point::new(1, 1), Point::new(1, 1)).unwrap();
        let mut calls = 0;
        let result = ColonyRunner::run_with_observer(
            &g,
            AntSystem,
            &ColonyConfig::ant_system().with_seed(1),
            |_| calls += 1,
        )
        .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(result.iterations, 0);
        assert!(result.best.valid);
        assert_eq!(result.best.points, vec![Point::new(1, 1)]);
        assert_eq!(result.best.length, 0.0);
        assert_eq!(result.best.turn_num, 0);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_step_reports_every_iteration() {
        let g = open();
        let config = ColonyConfig::ant_system()
            .with_ants(10)
            .with_max_iterations(4)
            .with_seed(11);
        let mut colony = Colony::new(&g, AntSystem, config).unwrap();
        let mut numbers = Vec::new();
        while let Some(report) = colony.step() {
            assert!(report.valid_tours <= 10);
            numbers.push(report.iteration);
        }
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(colony.is_end());
        assert!(colony.step().is_none());
        assert_eq!(colony.history().len(), 4);
    }

    #[test]
    fn test_history_is_monotone_and_converged_at_matches() {
        let g = GridGraph::from_ascii(&[
            "S.....",
            ".##...",
            "...#..",
            ".#..#.",
            "......",
            "....#E",
        ])
        .unwrap();
        let config = ColonyConfig::ant_system()
            .with_ants(15)
            .with_max_iterations(20)
            .with_seed(5);
        let result = ColonyRunner::run(&g, AntSystem, &config).unwrap();
        assert_eq!(result.history.len(), 20);
        for w in result.history.windows(2) {
            assert!(w[1] <= w[0]);
        }
        let mut previous = f64::INFINITY;
        let mut last_change = 0;
        for (i, &h) in result.history.iter().enumerate() {
            if h < previous {
                last_change = i + 1;
            }
            previous = h;
        }
        assert_eq!(result.converged_at, last_change);
    }

    #[test]
    fn test_tours_never_revisit_points() {
        let g = open();
        let config = ColonyConfig::acs().with_ants(20).with_max_iterations(3).with_seed(2);
        let mut colony = Colony::new(&g, AntColonySystem::default(), config).unwrap();
        while colony.step().is_some() {}
        let points = colony.best().points();
        let unique: std::collections::HashSet<_> = points.iter().collect();
        assert_eq!(unique.len(), points.len());
    }

    #[test]
    fn test_pheromone_stays_positive() {
        let g = GridGraph::from_ascii(&["S#...", "...#.", ".#..E"]).unwrap();
        let config = ColonyConfig::ant_system()
            .with_ants(10)
            .with_max_iterations(30)
            .with_rho(0.99)
            .with_seed(9);
        let mut colony = Colony::new(&g, AntSystem, config).unwrap();
        while colony.step().is_some() {
            assert!(colony.pheromone().min_strength() > 0.0);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let g = open();
        let config = ColonyConfig::ant_system()
            .with_ants(8)
            .with_max_iterations(5)
            .with_seed(42);
        let a = ColonyRunner::run(&g, AntSystem, &config).unwrap();
        let b = ColonyRunner::run(&g, AntSystem, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_many_uses_consecutive_seeds() {
        let g = open();
        let config = ColonyConfig::ant_system()
            .with_ants(5)
            .with_max_iterations(3)
            .with_seed(100);
        let batch = ColonyRunner::run_many(&g, &AntSystem, &config, 3).unwrap();
        assert_eq!(batch.len(), 3);
        let second = ColonyRunner::run(&g, AntSystem, &config.clone().with_seed(101)).unwrap();
        assert_eq!(batch[1], second);
    }

    #[test]
    fn test_disconnected_map_reports_unreached() {
        let g = GridGraph::from_ascii(&["S#.", "##.", "..E"]).unwrap();
        let config = ColonyConfig::ant_system()
            .with_ants(5)
            .with_max_iterations(7)
            .with_seed(3);
        let result = ColonyRunner::run(&g, AntSystem, &config).unwrap();
        assert_eq!(result.iterations, 7);
        assert!(!result.best.valid);
        assert!(result.best.length.is_infinite());
        assert!(result.history.iter().all(|h| h.is_infinite()));
        assert_eq!(result.converged_at, 0);
    }
}
