//! List-backed tour.

use super::{step_heading, Trace};
use crate::grid::{Direction, Point};
use std::collections::HashSet;

/// A path stored as a point list plus a visited set.
///
/// Only the tail can change. Membership is answered from the set, the
/// current heading from the last step.
#[derive(Debug, Clone)]
pub struct ListPath {
    points: Vec<Point>,
    visited: HashSet<Point>,
    length: f64,
    turn_num: usize,
    heading: Option<Direction>,
    valid: bool,
}

impl Default for ListPath {
    fn default() -> Self {
        Self::new()
    }
}

impl ListPath {
    /// An empty, valid path.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            visited: HashSet::new(),
            length: 0.0,
            turn_num: 0,
            heading: None,
            valid: true,
        }
    }

    /// Sentinel for "no path yet": invalid with infinite length.
    pub fn unreached() -> Self {
        Self {
            length: f64::INFINITY,
            valid: false,
            ..Self::new()
        }
    }

    /// Builds a path by appending every point in order.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut path = Self::new();
        for p in points {
            path.push(p);
        }
        path
    }

    /// Appends a point, updating length and turn count.
    pub fn push(&mut self, p: Point) {
        if let Some(&last) = self.points.last() {
            let (heading, turned) = step_heading(self.heading, last, p);
            self.length += last.distance(p);
            self.turn_num += usize::from(turned);
            self.heading = heading;
        }
        self.points.push(p);
        self.visited.insert(p);
    }

    /// Removes the tail point and returns it.
    ///
    /// With `keep_visited` the point stays in the membership set, so a
    /// backtracking agent will not step onto it again.
    pub fn pop(&mut self, keep_visited: bool) -> Option<Point> {
        let p = self.points.pop()?;
        if let Some(&last) = self.points.last() {
            self.length -= last.distance(p);
            let n = self.points.len();
            self.heading = (n >= 2).then(|| self.points[n - 2].direction_to(last)).flatten();
            if self.heading.is_some() && self.heading != last.direction_to(p) {
                self.turn_num -= 1;
            }
        }
        if self.points.is_empty() {
            self.length = 0.0;
        }
        if !keep_visited {
            self.visited.remove(&p);
        }
        Some(p)
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Heading of the last step, `None` with fewer than two points.
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// True if stepping to `p` continues the current heading. Paths with
    /// fewer than two points have no heading and accept every step.
    pub fn is_heading_toward(&self, p: Point) -> bool {
        match (self.heading, self.last()) {
            (Some(heading), Some(last)) => last.direction_to(p) == Some(heading),
            _ => true,
        }
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

    /// Consecutive point pairs in travel order.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Marks the tour as abandoned.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Resets to an empty, valid path.
    pub fn clear(&mut self) {
        self.points.clear();
        self.visited.clear();
        self.length = 0.0;
        self.turn_num = 0;
        self.heading = None;
        self.valid = true;
    }
}

impl Trace for ListPath {
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
        self.visited.contains(&p)
    }

    fn to_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}
