//! Per-edge pheromone storage.

use crate::grid::{GridGraph, Point};

/// Mutable pheromone strengths for every directed edge of a graph.
///
/// Storage mirrors the graph's adjacency lists: one strength per
/// neighbor slot of each free cell. Each colony (or tribe) owns its own
/// field exclusively.
///
/// Every mutation clamps to [`FLOOR`](Self::FLOOR), so strengths stay
/// strictly positive no matter how often an edge is evaporated or
/// penalized.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    width: usize,
    length: usize,
    targets: Vec<Vec<Point>>,
    strengths: Vec<Vec<f64>>,
}

impl PheromoneField {
    /// Smallest strength any edge can hold.
    pub const FLOOR: f64 = 1e-12;

    /// Same initial strength on every edge.
    pub fn uniform(graph: &GridGraph, t0: f64) -> Self {
        Self::from_fn(graph, |_, _, _| t0)
    }

    /// Initial strength computed per edge from `(r, s, cost)`.
    pub fn from_fn<F>(graph: &GridGraph, mut init: F) -> Self
    where
        F: FnMut(Point, Point, f64) -> f64,
    {
        let mut targets = Vec::with_capacity(graph.cell_count());
        let mut strengths = Vec::with_capacity(graph.cell_count());
        for idx in 0..graph.cell_count() {
            let r = graph.point_at(idx);
            let adjacent = graph.neighbors(r);
            targets.push(adjacent.iter().map(|&(s, _)| s).collect());
            strengths.push(
                adjacent
                    .iter()
                    .map(|&(s, cost)| sanitize(init(r, s, cost)))
                    .collect(),
            );
        }
        Self {
            width: graph.width(),
            length: graph.length(),
            targets,
            strengths,
        }
    }

    fn slot(&self, r: Point, s: Point) -> Option<(usize, usize)> {
        if r.x < 0 || r.y < 0 || r.x as usize >= self.width || r.y as usize >= self.length {
            return None;
        }
        let cell = r.x as usize * self.length + r.y as usize;
        let k = self.targets[cell].iter().position(|&t| t == s)?;
        Some((cell, k))
    }

    /// Strength of `r → s`, or 0 if the edge does not exist.
    pub fn get(&self, r: Point, s: Point) -> f64 {
        self.slot(r, s)
            .map_or(0.0, |(cell, k)| self.strengths[cell][k])
    }

    /// Overwrites `r → s`. Missing edges are ignored.
    pub fn set(&mut self, r: Point, s: Point, value: f64) {
        if let Some((cell, k)) = self.slot(r, s) {
            self.strengths[cell][k] = sanitize(value);
        }
    }

    /// Adds `delta` (possibly negative) to `r → s`.
    pub fn add(&mut self, r: Point, s: Point, delta: f64) {
        if let Some((cell, k)) = self.slot(r, s) {
            let t = &mut self.strengths[cell][k];
            *t = sanitize(*t + delta);
        }
    }

    /// Moves `r → s` toward `target`: `t ← (1 − rate)·t + rate·target`.
    pub fn relax_toward(&mut self, r: Point, s: Point, rate: f64, target: f64) {
        if let Some((cell, k)) = self.slot(r, s) {
            let t = &mut self.strengths[cell][k];
            *t = sanitize((1.0 - rate) * *t + rate * target);
        }
    }

    /// Multiplies every edge by `1 − rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        self.for_each_mut(|t| *t = sanitize(*t * keep));
    }

    /// Bounds every edge into `[min, max]` (the floor still applies).
    pub fn clamp(&mut self, min: f64, max: f64) {
        self.for_each_mut(|t| *t = sanitize(t.max(min).min(max)));
    }

    fn for_each_mut<F: FnMut(&mut f64)>(&mut self, mut f: F) {
        for row in &mut self.strengths {
            for t in row.iter_mut() {
                f(t);
            }
        }
    }

    /// All edges as `(r, s, strength)`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point, f64)> + '_ {
        let length = self.length;
        self.targets
            .iter()
            .zip(&self.strengths)
            .enumerate()
            .flat_map(move |(cell, (targets, strengths))| {
                let r = Point::new((cell / length) as i32, (cell % length) as i32);
                targets
                    .iter()
                    .zip(strengths)
                    .map(move |(&s, &t)| (r, s, t))
            })
    }

    pub fn edge_count(&self) -> usize {
        self.targets.iter().map(Vec::len).sum()
    }

    /// Smallest strength held by any edge (`+∞` for an edgeless graph).
    pub fn min_strength(&self) -> f64 {
        self.edges().map(|(_, _, t)| t).fold(f64::INFINITY, f64::min)
    }

    /// Largest strength held by any edge (0 for an edgeless graph).
    pub fn max_strength(&self) -> f64 {
        self.edges().map(|(_, _, t)| t).fold(0.0, f64::max)
    }
}

/// Floors a strength; NaN collapses to the floor.
fn sanitize(t: f64) -> f64 {
    if t.is_nan() {
        PheromoneField::FLOOR
    } else {
        t.max(PheromoneField::FLOOR)
    }
}
