//! Linked tour with point lookup.

use super::{step_heading, Trace};
use crate::grid::{Direction, Point};
use std::collections::HashMap;

/// One link of a [`LinkedPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkNode {
    pub point: Point,
    /// Slot of the following link, `None` at the tail.
    pub next: Option<usize>,
    /// Path length from the head up to this point.
    pub distance: f64,
}

/// A path kept as a chain of links stored in an arena, with a
/// point → link index.
///
/// Any visited point's link is found in O(1), which lets a tour that
/// rejoins a reference path walk back over the segment it just built.
#[derive(Debug, Clone)]
pub struct LinkedPath {
    nodes: Vec<LinkNode>,
    slots: HashMap<Point, usize>,
    length: f64,
    turn_num: usize,
    heading: Option<Direction>,
    valid: bool,
}

impl Default for LinkedPath {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkedPath {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            slots: HashMap::new(),
            length: 0.0,
            turn_num: 0,
            heading: None,
            valid: true,
        }
    }

    pub fn push(&mut self, p: Point) {
        let slot = self.nodes.len();
        if let Some(tail) = self.nodes.last_mut() {
            let (heading, turned) = step_heading(self.heading, tail.point, p);
            self.length += tail.point.distance(p);
            self.turn_num += usize::from(turned);
            self.heading = heading;
            tail.next = Some(slot);
        }
        self.nodes.push(LinkNode {
            point: p,
            next: None,
            distance: self.length,
        });
        self.slots.insert(p, slot);
    }

    /// Unlinks and returns the tail point.
    pub fn pop(&mut self) -> Option<Point> {
        let removed = self.nodes.pop()?;
        self.slots.remove(&removed.point);
        let n = self.nodes.len();
        if let Some(tail) = self.nodes.last_mut() {
            tail.next = None;
            self.length = tail.distance;
            let prev = tail.point;
            self.heading = (n >= 2)
                .then(|| self.nodes[n - 2].point.direction_to(prev))
                .flatten();
            if self.heading.is_some() && self.heading != prev.direction_to(removed.point) {
                self.turn_num -= 1;
            }
        } else {
            self.length = 0.0;
            self.heading = None;
        }
        Some(removed.point)
    }

    /// Link of `p`, if `p` is on the path.
    pub fn node(&self, p: Point) -> Option<&LinkNode> {
        self.slots.get(&p).map(|&slot| &self.nodes[slot])
    }

    pub fn head(&self) -> Option<Point> {
        self.nodes.first().map(|n| n.point)
    }

    pub fn tail(&self) -> Option<Point> {
        self.nodes.last().map(|n| n.point)
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Edges from `from` to `to`, following links.
    ///
    /// Yields nothing if either point is missing or `to` does not follow
    /// `from`.
    pub fn segment(&self, from: Point, to: Point) -> Segment<'_> {
        let (cursor, stop) = match (self.slots.get(&from), self.slots.get(&to)) {
            (Some(&a), Some(&b)) if a <= b => (Some(a), b),
            _ => (None, 0),
        };
        Segment {
            path: self,
            cursor,
            stop,
        }
    }
}

/// Iterator returned by [`LinkedPath::segment`].
pub struct Segment<'a> {
    path: &'a LinkedPath,
    cursor: Option<usize>,
    stop: usize,
}

impl Iterator for Segment<'_> {
    type Item = (Point, Point);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        if slot == self.stop {
            self.cursor = None;
            return None;
        }
        let node = &self.path.nodes[slot];
        let next = node.next?;
        self.cursor = Some(next);
        Some((node.point, self.path.nodes[next].point))
    }
}

impl Trace for LinkedPath {
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
        self.nodes.len()
    }

    fn contains(&self, p: Point) -> bool {
        self.slots.contains_key(&p)
    }

    fn to_points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.nodes.len());
        let mut cursor = (!self.nodes.is_empty()).then_some(0);
        while let Some(slot) = cursor {
            points.push(self.nodes[slot].point);
            cursor = self.nodes[slot].next;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::trace_metrics;

    fn sample() -> LinkedPath {
        let mut path = LinkedPath::new();
        for (x, y) in [(0, 0), (1, 0), (2, 1), (3, 2), (3, 3)] {
            path.push(Point::new(x, y));
        }
        path
    }

    #[test]
    fn test_counters_match_replay() {
        let path = sample();
        let (length, turns) = trace_metrics(&path.to_points());
        assert!((path.length() - length).abs() < 1e-12);
        assert_eq!(path.turn_num(), turns);
        assert_eq!(turns, 2);
    }

    #[test]
    fn test_node_lookup() {
        let path = sample();
        let node = path.node(Point::new(2, 1)).unwrap();
        assert!((node.distance - (1.0 + std::f64::consts::SQRT_2)).abs() < 1e-12);
        assert!(node.next.is_some());
        assert!(path.node(Point::new(4, 4)).is_none());
        assert_eq!(path.node(Point::new(3, 3)).unwrap().next, None);
    }

    #[test]
    fn test_segment_walks_links() {
        let path = sample();
        let seg: Vec<_> = path.segment(Point::new(1, 0), Point::new(3, 2)).collect();
        assert_eq!(
            seg,
            vec![
                (Point::new(1, 0), Point::new(2, 1)),
                (Point::new(2, 1), Point::new(3, 2)),
            ]
        );
        assert_eq!(path.segment(Point::new(3, 2), Point::new(1, 0)).count(), 0);
        assert_eq!(path.segment(Point::new(2, 1), Point::new(2, 1)).count(), 0);
        assert_eq!(path.segment(Point::new(9, 9), Point::new(2, 1)).count(), 0);
    }

    #[test]
    fn test_pop_unlinks_tail() {
        let mut path = sample();
        assert_eq!(path.pop(), Some(Point::new(3, 3)));
        assert_eq!(path.tail(), Some(Point::new(3, 2)));
        assert!(!path.contains(Point::new(3, 3)));
        let (length, turns) = trace_metrics(&path.to_points());
        assert!((path.length() - length).abs() < 1e-12);
        assert_eq!(path.turn_num(), turns);
        assert_eq!(path.heading(), Some(Direction::NorthEast));

        while path.pop().is_some() {}
        assert!(path.is_empty());
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.turn_num(), 0);
    }
}
