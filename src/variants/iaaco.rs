//! Improved adaptive ant colony optimization.

use super::gap;
use crate::colony::{
    ColonyConfig, ConstructionPolicy, IterationOutcome, PheromoneField, Schedule, StepContext,
};
use crate::error::{check_positive, check_range, ConfigError};
use crate::grid::clearance::obstacle_distances;
use crate::grid::{GridGraph, Point};
use crate::path::{ListPath, Trace};

/// Improved adaptive ACO for indoor robots.
///
/// Desirability is `τ^α · H^β · μ^λ · ξ`:
///
/// - `H = ε / (σ1·d(r, s) + σ2·d(s, E))` with `ε = exp(−2(k/nc)²)`
/// - `μ = d(s, E) / max(|Δx|, |Δy|)` (angle guidance), 1 at the goal
/// - `ξ` excludes cells near obstacles: 1 beyond `2·Rs`, `Rs / d` within
///   `[Rs, 2·Rs]`, 0 closer than `Rs`, where `d` is the candidate's
///   precomputed clearance
///
/// `q0 = δ0·exp(−(k/nc)² / 2)`.
///
/// The global update ranks tours by `J = kL·L` and adapts
/// `ρ = κ·d(S, E) / J_best`. Every valid tour pulls its edges toward
/// `Q / L`; the best tour is pulled toward `Q / J_best · (J_best + J_worst) / 2`,
/// the worst toward `−Q / J_worst`, floored at `min_pheromone`. Edges off
/// every tour do not evaporate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iaaco {
    /// Angle-guidance exponent `λ`.
    pub lambda: f64,
    /// Scale of the adaptive evaporation rate `κ`, in (0, 1].
    pub kappa: f64,
    /// Step-cost weight `σ1`.
    pub sigma1: f64,
    /// Goal-distance weight `σ2`.
    pub sigma2: f64,
    /// Initial exploitation threshold `δ0`.
    pub delta0: f64,
    /// Safety radius `Rs`.
    pub safety_radius: f64,
    /// Length weight `kL` of the performance index.
    pub length_weight: f64,
    /// Floor applied to the worst tour's edges.
    pub min_pheromone: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    clearance: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    q0: f64,
    #[cfg_attr(feature = "serde", serde(skip))]
    decay: f64,
}

impl Default for Iaaco {
    fn default() -> Self {
        Self {
            lambda: 7.0,
            kappa: 0.9,
            sigma1: 0.1,
            sigma2: 0.9,
            delta0: 0.15,
            safety_radius: 0.5,
            length_weight: 1.0,
            min_pheromone: 0.1,
            clearance: Vec::new(),
            q0: 0.0,
            decay: 1.0,
        }
    }
}

impl Iaaco {
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    pub fn with_sigmas(mut self, sigma1: f64, sigma2: f64) -> Self {
        self.sigma1 = sigma1;
        self.sigma2 = sigma2;
        self
    }

    pub fn with_delta0(mut self, delta0: f64) -> Self {
        self.delta0 = delta0;
        self
    }

    pub fn with_safety_radius(mut self, rs: f64) -> Self {
        self.safety_radius = rs;
        self
    }

    /// Performance index `J` of a tour.
    pub fn performance<T: Trace + ?Sized>(&self, path: &T) -> f64 {
        self.length_weight * path.length()
    }

    /// Angle-guidance factor of stepping onto `s`.
    pub fn angle_guidance(s: Point, end: Point) -> f64 {
        let axis = s.chebyshev_distance(end);
        if axis == 0 {
            1.0
        } else {
            s.distance(end) / f64::from(axis)
        }
    }

    /// Obstacle-exclusion factor for a cell with clearance `d`.
    pub fn exclusion(&self, d: f64) -> f64 {
        let rs = self.safety_radius;
        if d > 2.0 * rs {
            1.0
        } else if d >= rs {
            rs / d
        } else {
            0.0
        }
    }

    fn clearance_at(&self, graph: &GridGraph, p: Point) -> f64 {
        graph
            .index(p)
            .and_then(|i| self.clearance.get(i))
            .copied()
            .unwrap_or(f64::INFINITY)
    }
}

impl ConstructionPolicy for Iaaco {
    fn name(&self) -> &'static str {
        "IAACO"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("lambda", self.lambda, 0.0, f64::MAX, "non-negative")?;
        if !(self.kappa > 0.0 && self.kappa <= 1.0) {
            return Err(ConfigError::out_of_range("kappa", self.kappa, "in (0, 1]"));
        }
        check_range("sigma1", self.sigma1, 0.0, f64::MAX, "non-negative")?;
        check_range("sigma2", self.sigma2, 0.0, f64::MAX, "non-negative")?;
        if self.sigma1 + self.sigma2 <= 0.0 {
            return Err(ConfigError::out_of_range(
                "sigma1 + sigma2",
                self.sigma1 + self.sigma2,
                "positive",
            ));
        }
        check_range("delta0", self.delta0, 0.0, 1.0, "in [0, 1]")?;
        check_range("safety_radius", self.safety_radius, 0.0, f64::MAX, "non-negative")?;
        check_positive("length_weight", self.length_weight)?;
        check_positive("min_pheromone", self.min_pheromone)?;
        Ok(())
    }

    fn prepare(&mut self, graph: &GridGraph, _config: &ColonyConfig) {
        self.clearance = obstacle_distances(graph);
    }

    fn init_pheromone(&self, graph: &GridGraph, config: &ColonyConfig) -> PheromoneField {
        PheromoneField::uniform(graph, config.deposit)
    }

    fn begin_iteration(&mut self, schedule: Schedule, _config: &ColonyConfig) {
        let f = schedule.number() as f64 / schedule.max_iterations as f64;
        self.decay = (-2.0 * f * f).exp();
        self.q0 = self.delta0 * (-0.5 * f * f).exp();
    }

    fn exploitation(&self, _ctx: &StepContext<'_>) -> f64 {
        self.q0
    }

    fn heuristic(&self, ctx: &StepContext<'_>, _r: Point, s: Point, cost: f64) -> f64 {
        self.decay / (self.sigma1 * cost + self.sigma2 * gap(s, ctx.graph.end()))
    }

    fn desirability(&self, ctx: &StepContext<'_>, r: Point, s: Point, cost: f64) -> f64 {
        let tau = ctx.pheromone.get(r, s);
        let h = self.heuristic(ctx, r, s, cost);
        let mu = Self::angle_guidance(s, ctx.graph.end());
        let xi = self.exclusion(self.clearance_at(ctx.graph, s));
        tau.powf(ctx.config.alpha) * h.powf(ctx.config.beta) * mu.powf(self.lambda) * xi
    }

    fn global_update(&mut self, field: &mut PheromoneField, outcome: &IterationOutcome<'_>) {
        let mut best: Option<(&ListPath, f64)> = None;
        let mut worst: Option<(&ListPath, f64)> = None;
        for tour in outcome.valid_tours() {
            let j = self.performance(tour);
            if best.is_none_or(|(_, jb)| j <= jb) {
                best = Some((tour, j));
            }
            if worst.is_none_or(|(_, jw)| j >= jw) {
                worst = Some((tour, j));
            }
        }
        let (Some((best, j_best)), Some((worst, j_worst))) = (best, worst) else {
            return;
        };

        let q = outcome.config.deposit;
        let span = outcome.graph.start().distance(outcome.graph.end());
        let rho = (self.kappa * span / j_best.max(super::MIN_GAP)).clamp(0.0, 1.0);

        for tour in outcome.valid_tours() {
            let target = q / tour.length().max(super::MIN_GAP);
            for (r, s) in tour.edges() {
                field.relax_toward(r, s, rho, target);
            }
        }
        let reward = q / j_best.max(super::MIN_GAP) * (j_best + j_worst) / 2.0;
        for (r, s) in best.edges() {
            field.relax_toward(r, s, rho, reward);
        }
        let penalty = q / j_worst.max(super::MIN_GAP);
        for (r, s) in worst.edges() {
            let t = (1.0 - rho) * field.get(r, s) - rho * penalty;
            field.set(r, s, t.max(self.min_pheromone));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::ColonyRunner;
    use crate::variants::fixtures;

    #[test]
    fn test_open_grid_finds_diagonal() {
        let config = ColonyConfig::iaaco().with_seed(51);
        let result = ColonyRunner::run(&fixtures::open(), Iaaco::default(), &config).unwrap();
        fixtures::assert_straight_diagonal(&result);
    }

    #[test]
    fn test_wall_forces_detour() {
        let config = ColonyConfig::iaaco().with_seed(52);
        let result = ColonyRunner::run(&fixtures::walled(), Iaaco::default(), &config).unwrap();
        fixtures::assert_goes_around_wall(&result);
    }

    #[test]
    fn test_boxed_in_start() {
        let config = ColonyConfig::iaaco().with_max_iterations(5).with_seed(53);
        let result = ColonyRunner::run(&fixtures::boxed_in(), Iaaco::default(), &config).unwrap();
        fixtures::assert_unreached(&result, 5);
    }

    #[test]
    fn test_exclusion_bands() {
        let policy = Iaaco::default();
        assert_eq!(policy.exclusion(1.5), 1.0);
        assert!((policy.exclusion(1.0) - 0.5).abs() < 1e-12);
        assert!((policy.exclusion(0.5) - 1.0).abs() < 1e-12);
        assert_eq!(policy.exclusion(0.0), 0.0);
    }

    #[test]
    fn test_angle_guidance() {
        let end = Point::new(4, 4);
        assert_eq!(Iaaco::angle_guidance(end, end), 1.0);
        assert!((Iaaco::angle_guidance(Point::new(1, 1), end) - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!((Iaaco::angle_guidance(Point::new(4, 0), end) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worst_tour_is_floored() {
        let graph = fixtures::open();
        let config = ColonyConfig::iaaco();
        let mut policy = Iaaco::default();
        let mut field = PheromoneField::uniform(&graph, 0.2);
        let short = ListPath::from_points([
            Point::new(0, 0),
            Point::new(1, 1),
            Point::new(2, 2),
            Point::new(3, 3),
            Point::new(4, 4),
        ]);
        let long = ListPath::from_points([
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(3, 0),
            Point::new(4, 0),
            Point::new(4, 1),
            Point::new(4, 2),
            Point::new(4, 3),
            Point::new(4, 4),
        ]);
        let tours = vec![short.clone(), long];
        let outcome = IterationOutcome {
            graph: &graph,
            config: &config,
            schedule: Schedule {
                index: 0,
                max_iterations: 1,
            },
            tours: &tours,
            iteration_best: Some(0),
            best: &short,
        };
        policy.global_update(&mut field, &outcome);

        // Straight tour: J_best = d(S, E), so ρ = κ.
        let on_short = field.get(Point::new(0, 0), Point::new(1, 1));
        assert!(on_short > 0.2);
        let on_long = field.get(Point::new(1, 0), Point::new(2, 0));
        assert!((on_long - policy.min_pheromone).abs() < 1e-12);
        let untouched = field.get(Point::new(0, 1), Point::new(0, 2));
        assert!((untouched - 0.2).abs() < 1e-12);
    }
}
