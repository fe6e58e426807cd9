//! Multi-tribe execution loop.

use super::config::{Role, TribeConfig};
use crate::colony::{pseudo_random_proportional, PheromoneField};
use crate::error::ColonyError;
use crate::grid::{Direction, GridGraph, Point};
use crate::path::{LinkedPath, ListPath, PathOrder, PathSnapshot, RecordPath, Trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

/// Base of the heading-change penalty `1.5^(−Δ)`.
const TURN_BASE: f64 = 1.5;

/// Result of a multi-tribe run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TribeResult {
    /// Best of the tribe bests.
    pub best: PathSnapshot,

    /// Final best of every tribe, in tribe order.
    pub tribe_bests: Vec<PathSnapshot>,

    /// Iterations executed (0 when start equals end).
    pub iterations: usize,

    /// Shortest overall best length reached after each iteration.
    pub history: Vec<f64>,

    /// Iteration number at which `history` last changed (0 if never).
    pub converged_at: usize,
}

/// Summary handed out after every iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TribeReport {
    /// 1-based number of the iteration just completed.
    pub iteration: usize,
    /// Role every agent played this iteration.
    pub role: Role,
    pub best: PathSnapshot,
    pub tribe_bests: Vec<PathSnapshot>,
    /// Tours that reached the goal, over all tribes.
    pub valid_tours: usize,
}

/// One tribe: its own pheromone and its own reference path.
#[derive(Debug, Clone)]
struct Tribe {
    field: PheromoneField,
    best: RecordPath,
}

impl Tribe {
    /// Cooperative refinement after the agent rejoined the reference path
    /// at `to`, having left it at `from` when its length was `from_len`.
    ///
    /// A shorter detour inherits the pheromone of the reference segment it
    /// bypasses, spread over its own edges. Otherwise the reference
    /// segment is reinforced in proportion to how much shorter it is.
    fn refine(&mut self, path: &LinkedPath, from: Point, to: Point, from_len: f64, t0: f64) {
        let (Some(a), Some(b)) = (self.best.position(from), self.best.position(to)) else {
            return;
        };
        if b <= a {
            return;
        }
        let (Some(da), Some(db)) = (self.best.distance_to(from), self.best.distance_to(to)) else {
            return;
        };
        let reference = db - da;
        let detour = path.length() - from_len;
        if detour <= 0.0 {
            return;
        }

        if detour < reference {
            let carried: f64 = self.best.segment(from, to).map(|(r, s)| self.field.get(r, s)).sum();
            let delta = carried / detour;
            for (r, s) in path.segment(from, to) {
                self.field.add(r, s, delta);
            }
        } else {
            let delta = reference / detour * t0;
            for (r, s) in self.best.segment(from, to) {
                self.field.add(r, s, delta);
            }
        }
    }
}

/// `a^cos θ`, where `θ` is the angle between the step `r → s` and the
/// bearing `r → target`. A zero bearing counts as perpendicular.
pub fn angle_heuristic(base: f64, r: Point, s: Point, target: Point) -> f64 {
    let (ax, ay) = (f64::from(s.x - r.x), f64::from(s.y - r.y));
    let (bx, by) = (f64::from(target.x - r.x), f64::from(target.y - r.y));
    let norm = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    let cos = if norm > 0.0 {
        ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    base.powf(cos)
}

/// Correction factor of stepping `r → s`.
fn correction(
    tribe: &Tribe,
    rivals: &[&PheromoneField],
    heading: Option<Direction>,
    r: Point,
    s: Point,
) -> f64 {
    let turn = match (heading, r.direction_to(s)) {
        (Some(h), Some(d)) => h.turn_steps(d),
        _ => 0,
    };
    let mut f = TURN_BASE.powi(-i32::from(turn));

    if let (Some(i), Some(j)) = (tribe.best.position(r), tribe.best.position(s)) {
        f *= 2f64.powi(j as i32 - i as i32 - 1);
    }
    if !rivals.is_empty() {
        let rival: f64 = rivals.iter().map(|field| field.get(r, s)).sum();
        f *= tribe.field.get(r, s) / rival;
    }
    f
}

/// Read-only surroundings of one tour.
struct TourEnv<'a> {
    graph: &'a GridGraph,
    config: &'a TribeConfig,
    role: Role,
    agent: usize,
}

/// Point the agent steers toward from `r`.
fn waypoint<R: Rng + ?Sized>(env: &TourEnv<'_>, best: &RecordPath, r: Point, rng: &mut R) -> Point {
    let end = env.graph.end();
    if best.is_empty() {
        return end;
    }
    let Some(pos) = best.position(r) else {
        return end;
    };
    let ahead = match env.role {
        Role::Direct => return end,
        Role::Interpolated => {
            let ants = env.config.ants as f64;
            (ants - env.agent as f64) / ants
        }
        Role::Random => rng.random::<f64>(),
    };
    let last = best.len() - 1;
    let offset = ((last - pos) as f64 * ahead).ceil() as usize;
    best.get((pos + offset).min(last)).unwrap_or(end)
}

fn choose<R: Rng + ?Sized>(
    env: &TourEnv<'_>,
    tribe: &Tribe,
    rivals: &[&PheromoneField],
    path: &LinkedPath,
    r: Point,
    target: Point,
    rng: &mut R,
) -> Option<Point> {
    let (alpha, beta) = env.config.exponents(env.role);
    let candidates: Vec<(Point, f64)> = env
        .graph
        .neighbors(r)
        .iter()
        .filter(|&&(s, _)| !path.contains(s))
        .map(|&(s, _)| {
            let tau = tribe.field.get(r, s);
            let h = angle_heuristic(env.config.angle_base, r, s, target);
            let f = correction(tribe, rivals, path.heading(), r, s);
            (s, tau.powf(alpha) * h.powf(beta) * f)
        })
        .collect();
    pseudo_random_proportional(&candidates, env.config.q0, rng)
}

/// Walks one agent of `tribe` from start to goal, re-targeting every time
/// it rejoins the tribe's reference path. A dead end invalidates the tour;
/// refinements made before it stay.
fn construct_tour<R: Rng + ?Sized>(
    env: &TourEnv<'_>,
    tribe: &mut Tribe,
    rivals: &[&PheromoneField],
    rng: &mut R,
) -> LinkedPath {
    let end = env.graph.end();
    let (rho, t0) = (env.config.rho, env.config.t0);
    let mut r = env.graph.start();
    let mut path = LinkedPath::new();
    path.push(r);

    while r != end {
        let anchor = r;
        let anchor_len = path.length();
        let target = waypoint(env, &tribe.best, r, rng);
        loop {
            let Some(s) = choose(env, tribe, rivals, &path, r, target, rng) else {
                path.invalidate();
                return path;
            };
            tribe.field.relax_toward(r, s, rho, t0);
            path.push(s);
            r = s;
            if tribe.best.contains(r) {
                tribe.refine(&path, anchor, r, anchor_len, t0);
                break;
            }
            if r == end {
                break;
            }
        }
    }
    path
}

/// Steppable multi-tribe coordinator.
///
/// Every iteration, agent `k` of tribe 0, 1, ... builds its tour before
/// agent `k + 1` of any tribe, so each tour sees the rival tribes' local
/// updates made so far.
pub struct TribeColony<'g> {
    graph: &'g GridGraph,
    config: TribeConfig,
    order: PathOrder,
    tribes: Vec<Tribe>,
    rng: StdRng,
    iteration: usize,
    best: PathSnapshot,
    history: Vec<f64>,
    converged_at: usize,
    trivial: bool,
    warned: bool,
}

impl<'g> TribeColony<'g> {
    pub fn new(graph: &'g GridGraph, config: TribeConfig) -> Result<Self, ColonyError> {
        config.validate()?;

        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let trivial = graph.start() == graph.end();
        let mut reference = RecordPath::new();
        if trivial {
            reference.load(&ListPath::from_points([graph.start()]));
        }
        let tribes = (0..config.tribes)
            .map(|_| Tribe {
                field: PheromoneField::uniform(graph, config.t0),
                best: reference.clone(),
            })
            .collect();

        Ok(Self {
            graph,
            order: config.path_order(),
            tribes,
            rng,
            iteration: 0,
            best: reference.snapshot(),
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
    pub fn step(&mut self) -> Option<TribeReport> {
        if self.is_end() {
            return None;
        }
        let role = self.config.role_at(self.iteration + 1);

        let mut candidates: Vec<Vec<LinkedPath>> = vec![Vec::new(); self.tribes.len()];
        let mut valid_tours = 0;
        for agent in 0..self.config.ants {
            for t in 0..self.tribes.len() {
                let tour = self.tour(t, agent, role);
                if !tour.is_valid() {
                    trace!(tribe = t, agent, steps = tour.len(), "tour abandoned at a dead end");
                    continue;
                }
                valid_tours += 1;
                candidates[t].push(tour);
            }
        }

        for (tribe, tours) in self.tribes.iter_mut().zip(&candidates) {
            if let Some(i) = self.order.best_index(tours) {
                if self.order.is_better(&tours[i], &tribe.best) {
                    tribe.best.load(&tours[i]);
                }
            }
        }
        self.refresh_best();
        self.iteration += 1;

        let reached = self.history.last().map_or(self.best.length, |&h| h.min(self.best.length));
        if self.history.last().is_none_or(|&h| reached < h) && reached.is_finite() {
            self.converged_at = self.iteration;
        }
        self.history.push(reached);

        if valid_tours == 0 && !self.warned {
            warn!(iteration = self.iteration, "no agent of any tribe reached the goal this iteration");
            self.warned = true;
        }
        debug!(
            iteration = self.iteration,
            ?role,
            best_length = self.best.length,
            best_turns = self.best.turn_num,
            valid_tours,
            "tribe iteration complete"
        );

        Some(TribeReport {
            iteration: self.iteration,
            role,
            best: self.best.clone(),
            tribe_bests: self.tribe_bests(),
            valid_tours,
        })
    }

    fn tour(&mut self, t: usize, agent: usize, role: Role) -> LinkedPath {
        let (head, rest) = self.tribes.split_at_mut(t);
        let Some((own, tail)) = rest.split_first_mut() else {
            let mut empty = LinkedPath::new();
            empty.invalidate();
            return empty;
        };
        let rivals: Vec<&PheromoneField> = head.iter().chain(tail.iter()).map(|x| &x.field).collect();
        let env = TourEnv {
            graph: self.graph,
            config: &self.config,
            role,
            agent,
        };
        construct_tour(&env, own, &rivals, &mut self.rng)
    }

    /// Overall best across the tribe bests, independent of tribe order.
    fn refresh_best(&mut self) {
        let bests: Vec<&RecordPath> = self.tribes.iter().map(|t| &t.best).collect();
        if let Some(i) = self.order.best_index(&bests) {
            self.best = bests[i].snapshot();
        }
    }

    pub fn graph(&self) -> &'g GridGraph {
        self.graph
    }

    pub fn config(&self) -> &TribeConfig {
        &self.config
    }

    /// Pheromone field of tribe `t`.
    pub fn pheromone(&self, t: usize) -> Option<&PheromoneField> {
        self.tribes.get(t).map(|tribe| &tribe.field)
    }

    /// Reference path of tribe `t`.
    pub fn tribe_best(&self, t: usize) -> Option<&RecordPath> {
        self.tribes.get(t).map(|tribe| &tribe.best)
    }

    pub fn tribe_bests(&self) -> Vec<PathSnapshot> {
        self.tribes.iter().map(|t| t.best.snapshot()).collect()
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn best(&self) -> &PathSnapshot {
        &self.best
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn into_result(self) -> TribeResult {
        let tribe_bests = self.tribe_bests();
        TribeResult {
            best: self.best,
            tribe_bests,
            iterations: self.iteration,
            history: self.history,
            converged_at: self.converged_at,
        }
    }
}

/// Runs multi-tribe colonies to completion.
///
/// ```
/// use u_antpath::grid::GridGraph;
/// use u_antpath::tribes::{TribeConfig, TribeRunner};
///
/// let graph = GridGraph::from_ascii(&["S...", ".#..", "...E"]).unwrap();
/// let result = TribeRunner::run(&graph, &TribeConfig::default().with_seed(5)).unwrap();
/// assert_eq!(result.tribe_bests.len(), 3);
/// ```
pub struct TribeRunner;

impl TribeRunner {
    pub fn run(graph: &GridGraph, config: &TribeConfig) -> Result<TribeResult, ColonyError> {
        Self::run_with_observer(graph, config, |_| {})
    }

    /// Runs the full budget, calling `observer` after every iteration.
    pub fn run_with_observer<F>(
        graph: &GridGraph,
        config: &TribeConfig,
        mut observer: F,
    ) -> Result<TribeResult, ColonyError>
    where
        F: FnMut(&TribeReport),
    {
        let mut colony = TribeColony::new(graph, config.clone())?;
        while let Some(report) = colony.step() {
            observer(&report);
        }
        let result = colony.into_result();
        info!(
            variant = "MHACO",
            tribes = result.tribe_bests.len(),
            iterations = result.iterations,
            best_length = result.best.length,
            best_turns = result.best.turn_num,
            converged_at = result.converged_at,
            "tribe run finished"
        );
        Ok(result)
    }
}
