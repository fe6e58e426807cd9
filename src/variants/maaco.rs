//! Modified adaptive ant colony optimization.

use super::{deposit_along, gap};
use crate::colony::{
    ColonyConfig, ConstructionPolicy, IterationOutcome, PheromoneField, Schedule, StepContext,
};
use crate::error::{check_positive, check_range, ConfigError};
use crate::grid::{GridGraph, Point};
use crate::path::Trace;

/// Modified adaptive ACO.
///
/// - **Initial pheromone** is biased toward the start–goal corridor:
///   `τ(i, ·) = d(S, E) / (d(S, i) + d(E, i)) · t0`.
/// - **Heuristic** blends path length so far with the remaining distance,
///   weighting the remaining distance more heavily near the goal, and adds
///   a turn penalty: `1 / (g·d(S, j) + h·d(j, E) + a·c(j))`, with
///   `h = wh_max − (wh_max − wh_min)·exp(−d(j, E) / d(S, E))` and `g = 1 − h`.
/// - **Move restriction**: when more than three candidates remain, only
///   the bearing to the goal and its two 45° neighbors are allowed. This
///   can strand an agent that a full neighborhood would have saved.
/// - **q0 schedule**: decreases linearly from `q0` until iteration `k0`,
///   then climbs back from `q0 / 2`.
/// - **MMAS clamp** into `[τ_min, τ_max]` derived from the best length,
///   once a best exists.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maaco {
    /// Turn penalty weight `a`.
    pub turn_weight: f64,
    /// Upper bound of the goal-distance weight.
    pub wh_max: f64,
    /// Lower bound of the goal-distance weight.
    pub wh_min: f64,
    /// Iteration where the q0 schedule turns around, as a fraction of `nc`.
    pub turnaround: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    q0: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    span: f64,
}

impl Default for Maaco {
    fn default() -> Self {
        Self {
            turn_weight: 1.0,
            wh_max: 0.9,
            wh_min: 0.2,
            turnaround: 0.7,
            q0: 0.0,
            span: 1.0,
        }
    }
}

impl Maaco {
    pub fn with_turn_weight(mut self, a: f64) -> Self {
        self.turn_weight = a;
        self
    }

    pub fn with_weight_bounds(mut self, wh_min: f64, wh_max: f64) -> Self {
        self.wh_min = wh_min;
        self.wh_max = wh_max;
        self
    }

    pub fn with_turnaround(mut self, fraction: f64) -> Self {
        self.turnaround = fraction;
        self
    }

    /// Exploitation threshold for iteration `number` (1-based).
    pub fn q0_at(&self, number: usize, max_iterations: usize, q0: f64) -> f64 {
        let nc = max_iterations as f64;
        let k = number as f64;
        let k0 = self.turnaround * nc;
        let q = if k < k0 {
            (nc - k) / nc * q0
        } else {
            (k - k0) / nc * q0 + q0 / 2.0
        };
        q.clamp(0.0, 1.0)
    }

    /// Current exploitation threshold.
    pub fn q0(&self) -> f64 {
        self.q0
    }
}

impl ConstructionPolicy for Maaco {
    fn name(&self) -> &'static str {
        "MAACO"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("turn_weight", self.turn_weight, 0.0, f64::MAX, "non-negative")?;
        check_range("wh_min", self.wh_min, 0.0, 1.0, "in [0, 1]")?;
        check_range("wh_max", self.wh_max, self.wh_min, 1.0, "in [wh_min, 1]")?;
        check_positive("turnaround", self.turnaround)?;
        Ok(())
    }

    fn prepare(&mut self, graph: &GridGraph, config: &ColonyConfig) {
        self.span = gap(graph.start(), graph.end());
        self.q0 = config.q0;
    }

    fn init_pheromone(&self, graph: &GridGraph, config: &ColonyConfig) -> PheromoneField {
        let (start, end) = (graph.start(), graph.end());
        PheromoneField::from_fn(graph, |i, _, _| {
            self.span / (gap(start, i) + gap(end, i)) * config.t0
        })
    }

    fn begin_iteration(&mut self, schedule: Schedule, config: &ColonyConfig) {
        self.q0 = self.q0_at(schedule.number(), schedule.max_iterations, config.q0);
    }

    fn exploitation(&self, _ctx: &StepContext<'_>) -> f64 {
        self.q0
    }

    fn heuristic(&self, ctx: &StepContext<'_>, _r: Point, s: Point, cost: f64) -> f64 {
        let travelled = ctx.path.length() + cost;
        let remaining = gap(s, ctx.graph.end());
        let h = self.wh_max - (self.wh_max - self.wh_min) * (-remaining / self.span).exp();
        let g = 1.0 - h;
        let turns = ctx.path.turn_num() + usize::from(!ctx.path.is_heading_toward(s));
        1.0 / (g * travelled + h * remaining + self.turn_weight * turns as f64)
    }

    fn allowed_moves(&self, ctx: &StepContext<'_>, r: Point) -> Vec<(Point, f64)> {
        let open: Vec<(Point, f64)> = ctx
            .graph
            .neighbors(r)
            .iter()
            .copied()
            .filter(|&(s, _)| !ctx.path.contains(s))
            .collect();
        if open.len() <= 3 {
            return open;
        }
        let Some(bearing) = r.direction_to(ctx.graph.end()) else {
            return open;
        };
        let aligned = [bearing, bearing.rotate_left(), bearing.rotate_right()];
        open.into_iter()
            .filter(|&(s, _)| r.direction_to(s).is_some_and(|d| aligned.contains(&d)))
            .collect()
    }

    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>) {
        let config = outcome.config;
        let best = outcome.best;
        let bounds = best.is_valid().then(|| {
            let length = best.length().max(super::MIN_GAP);
            let t_max = 1.0 / (2.0 * (1.0 - config.rho)) / length + 200.0 / length;
            (t_max / 500.0, t_max)
        });

        field.evaporate(config.rho);
        if let Some((t_min, _)) = bounds {
            field.clamp(t_min, f64::INFINITY);
        }
        for tour in outcome.valid_tours() {
            deposit_along(field, tour, config.deposit / tour.length());
        }
        if let Some((_, t_max)) = bounds {
            field.clamp(0.0, t_max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::{Colony, ColonyRunner};
    use crate::path::ListPath;
    use crate::variants::fixtures;

    #[test]
    fn test_open_grid_finds_diagonal() {
        let config = ColonyConfig::maaco().with_max_iterations(30).with_seed(31);
        let result = ColonyRunner::run(&fixtures::open(), Maaco::default(), &config).unwrap();
        fixtures::assert_straight_diagonal(&result);
    }

    #[test]
    fn test_wall_forces_detour() {
        let config = ColonyConfig::maaco().with_max_iterations(30).with_seed(32);
        let result = ColonyRunner::run(&fixtures::walled(), Maaco::default(), &config).unwrap();
        fixtures::assert_goes_around_wall(&result);
    }

    #[test]
    fn test_q0_schedule() {
        let policy = Maaco::default();
        // nc = 100, q0 = 0.5, k0 = 70
        assert!((policy.q0_at(1, 100, 0.5) - 0.495).abs() < 1e-12);
        assert!((policy.q0_at(50, 100, 0.5) - 0.25).abs() < 1e-12);
        assert!((policy.q0_at(80, 100, 0.5) - 0.3).abs() < 1e-12);
        assert!((policy.q0_at(100, 100, 0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_initial_pheromone_favors_corridor() {
        let graph = fixtures::open();
        let mut policy = Maaco::default();
        let config = ColonyConfig::maaco();
        policy.prepare(&graph, &config);
        let field = policy.init_pheromone(&graph, &config);
        let on_line = field.get(Point::new(2, 2), Point::new(3, 3));
        let off_line = field.get(Point::new(4, 0), Point::new(3, 0));
        assert!((on_line - 1.0).abs() < 1e-9);
        assert!(off_line < on_line);
    }

    #[test]
    fn test_restricts_to_goal_bearing() {
        let graph = fixtures::open();
        let config = ColonyConfig::maaco();
        let field = PheromoneField::uniform(&graph, 1.0);
        let path = ListPath::from_points([Point::new(1, 0), Point::new(2, 1)]);
        let best = ListPath::unreached();
        let ctx = StepContext {
            graph: &graph,
            pheromone: &field,
            config: &config,
            schedule: Schedule {
                index: 0,
                max_iterations: 1,
            },
            path: &path,
            best: &best,
        };
        let moves: Vec<Point> = Maaco::default()
            .allowed_moves(&ctx, Point::new(2, 1))
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        // Bearing to (4, 4) is NE; N and E are its neighbors.
        assert_eq!(moves.len(), 3);
        assert!(moves.contains(&Point::new(3, 2)));
        assert!(moves.contains(&Point::new(2, 2)));
        assert!(moves.contains(&Point::new(3, 1)));
    }

    #[test]
    fn test_bearing_filter_skips_visited_points() {
        let graph = fixtures::open();
        let config = ColonyConfig::maaco();
        let field = PheromoneField::uniform(&graph, 1.0);
        let path = ListPath::from_points([
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(3, 2),
            Point::new(2, 2),
        ]);
        let best = ListPath::unreached();
        let ctx = StepContext {
            graph: &graph,
            pheromone: &field,
            config: &config,
            schedule: Schedule {
                index: 0,
                max_iterations: 1,
            },
            path: &path,
            best: &best,
        };
        let moves: Vec<Point> = Maaco::default()
            .allowed_moves(&ctx, Point::new(2, 2))
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        // E of (2, 2) is on the tour already; NE and N remain.
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Point::new(3, 3)));
        assert!(moves.contains(&Point::new(2, 3)));
        assert!(moves.iter().all(|&s| !path.contains(s)));
    }

    #[test]
    fn test_turn_penalty_prefers_straight_steps() {
        let graph = fixtures::open();
        let config = ColonyConfig::maaco();
        let mut policy = Maaco::default();
        policy.prepare(&graph, &config);
        let field = PheromoneField::uniform(&graph, 1.0);
        let path = ListPath::from_points([Point::new(0, 0), Point::new(1, 1)]);
        let best = ListPath::unreached();
        let ctx = StepContext {
            graph: &graph,
            pheromone: &field,
            config: &config,
            schedule: Schedule {
                index: 0,
                max_iterations: 1,
            },
            path: &path,
            best: &best,
        };
        let r = Point::new(1, 1);
        let straight = policy.heuristic(&ctx, r, Point::new(2, 2), std::f64::consts::SQRT_2);
        let turn = policy.heuristic(&ctx, r, Point::new(1, 2), 1.0);
        assert!(straight > turn);
    }

    #[test]
    fn test_clamp_waits_for_a_best() {
        let graph = fixtures::boxed_in();
        let config = ColonyConfig::maaco().with_max_iterations(40).with_seed(2);
        let mut colony = Colony::new(&graph, Maaco::default(), config).unwrap();
        while colony.step().is_some() {}
        // Evaporation alone for 40 rounds: 0.8^40 ≈ 1.3e-4 of the start value.
        assert!(colony.pheromone().min_strength() > 0.0);
        assert!(colony.pheromone().max_strength() < 1e-3);
    }
}
