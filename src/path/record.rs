//! Indexed reference path.

use super::{step_heading, Trace};
use crate::grid::{Direction, Point};
use std::collections::HashMap;

/// A path with O(1) position and distance-from-start lookups.
///
/// Used as the running "best reference" that agents steer toward and
/// splice onto. A fresh record is the unreached sentinel: empty, invalid,
/// infinite length.
#[derive(Debug, Clone)]
pub struct RecordPath {
    points: Vec<Point>,
    positions: HashMap<Point, usize>,
    cumulative: Vec<f64>,
    length: f64,
    turn_num: usize,
    heading: Option<Direction>,
    valid: bool,
}

impl Default for RecordPath {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordPath {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            positions: HashMap::new(),
            cumulative: Vec::new(),
            length: f64::INFINITY,
            turn_num: 0,
            heading: None,
            valid: false,
        }
    }

    /// Replaces the contents with the points of another trace.
    pub fn load<T: Trace + ?Sized>(&mut self, trace: &T) {
        self.clear();
        self.length = 0.0;
        for p in trace.to_points() {
            self.push(p);
        }
        self.valid = trace.is_valid();
        if !self.valid {
            self.length = f64::INFINITY;
        }
    }

    fn push(&mut self, p: Point) {
        if let Some(&last) = self.points.last() {
            let (heading, turned) = step_heading(self.heading, last, p);
            self.length += last.distance(p);
            self.turn_num += usize::from(turned);
            self.heading = heading;
        }
        self.positions.insert(p, self.points.len());
        self.points.push(p);
        self.cumulative.push(self.length);
    }

    /// Resets to the unreached sentinel.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Ordinal of `p` along the path.
    pub fn position(&self, p: Point) -> Option<usize> {
        self.positions.get(&p).copied()
    }

    /// Path length from the first point to `p`.
    pub fn distance_to(&self, p: Point) -> Option<f64> {
        self.position(p).map(|i| self.cumulative[i])
    }

    pub fn get(&self, i: usize) -> Option<Point> {
        self.points.get(i).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges between `from` and `to` (in that order along the path).
    /// Empty when either point is absent or `to` precedes `from`.
    pub fn segment(&self, from: Point, to: Point) -> impl Iterator<Item = (Point, Point)> + '_ {
        let range = match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) if a < b => a..b,
            _ => 0..0,
        };
        range.map(move |i| (self.points[i], self.points[i + 1]))
    }

    /// Heading of the path's step leaving `p` (or arriving, at the end).
    pub fn local_heading(&self, p: Point) -> Option<Direction> {
        let i = self.position(p)?;
        match (self.get(i), self.get(i + 1)) {
            (Some(a), Some(b)) => a.direction_to(b),
            _ => i.checked_sub(1).and_then(|j| self.points[j].direction_to(self.points[i])),
        }
    }

    /// True if the path changes heading at `p`. Endpoints count as turns.
    pub fn is_turn(&self, p: Point) -> bool {
        match self.position(p) {
            Some(i) if i > 0 && i + 1 < self.points.len() => {
                let pre = self.points[i - 1];
                let next = self.points[i + 1];
                pre.direction_to(p) != p.direction_to(next)
            }
            Some(_) => true,
            None => false,
        }
    }
}

impl Trace for RecordPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn turn_num(&self) -> usize {
        self.turn_num
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn contains(&self, p: Point) -> bool {
        self.positions.contains_key(&p)
    }

    fn to_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}
