//! Distance from every cell to the nearest obstacle.
//!
//! Cells outside the grid count as obstacles. The map is computed by
//! multi-source best-first propagation: every blocked cell and every
//! free cell's nearest border site seed a priority queue, and each popped
//! cell offers its nearest site to its 8 neighbors. The result is an
//! approximate Euclidean distance transform that never undershoots the
//! true distance.

use super::graph::GridGraph;
use super::point::{Direction, Point};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy)]
struct Frontier {
    dist: f64,
    cell: usize,
    site: Point,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed: BinaryHeap is a max-heap and we pop the nearest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

/// Nearest out-of-bounds cell of `p`, one step past the closest border.
fn border_site(graph: &GridGraph, p: Point) -> Point {
    let w = graph.width() as i32;
    let l = graph.length() as i32;
    [
        Point::new(-1, p.y),
        Point::new(w, p.y),
        Point::new(p.x, -1),
        Point::new(p.x, l),
    ]
    .into_iter()
    .min_by(|a, b| p.distance(*a).total_cmp(&p.distance(*b)))
    .unwrap_or(Point::new(-1, p.y))
}

/// Computes the obstacle distance of every cell, indexed by
/// [`GridGraph::index`]. Blocked cells have distance 0.
pub fn obstacle_distances(graph: &GridGraph) -> Vec<f64> {
    let n = graph.cell_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut heap = BinaryHeap::with_capacity(n);

    for cell in 0..n {
        let p = graph.point_at(cell);
        let (d, site) = if graph.is_blocked(p) {
            (0.0, p)
        } else {
            let site = border_site(graph, p);
            (p.distance(site), site)
        };
        dist[cell] = d;
        heap.push(Frontier { dist: d, cell, site });
    }

    while let Some(Frontier { dist: d, cell, site }) = heap.pop() {
        if d > dist[cell] {
            continue;
        }
        let here = graph.point_at(cell);
        for dir in Direction::ALL {
            let Some(next) = graph.index(here + dir) else {
                continue;
            };
            let candidate = graph.point_at(next).distance(site);
            if candidate < dist[next] {
                dist[next] = candidate;
                heap.push(Frontier {
                    dist: candidate,
                    cell: next,
                    site,
                });
            }
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustive reference: nearest blocked or border cell by brute force.
    fn brute_force(graph: &GridGraph, p: Point) -> f64 {
        let w = graph.width() as i32;
        let l = graph.length() as i32;
        let mut best = f64::INFINITY;
        for x in -1..=w {
            for y in -1..=l {
                let q = Point::new(x, y);
                if !graph.in_bounds(q) || graph.is_blocked(q) {
                    best = best.min(p.distance(q));
                }
            }
        }
        best
    }

    #[test]
    fn test_open_grid_measures_border() {
        let graph = GridGraph::open(5, 5, Point::new(0, 0), Point::new(4, 4)).unwrap();
        let dist = obstacle_distances(&graph);
        let at = |x, y| dist[graph.index(Point::new(x, y)).unwrap()];
        assert_eq!(at(0, 0), 1.0);
        assert_eq!(at(2, 2), 3.0);
        assert_eq!(at(1, 3), 2.0);
    }

    #[test]
    fn test_blocked_cells_are_zero() {
        let graph = GridGraph::from_ascii(&["S....", "..#..", "....E"]).unwrap();
        let dist = obstacle_distances(&graph);
        assert_eq!(dist[graph.index(Point::new(1, 2)).unwrap()], 0.0);
        assert_eq!(dist[graph.index(Point::new(1, 1)).unwrap()], 1.0);
        assert_eq!(dist[graph.index(Point::new(0, 1)).unwrap()], 1.0);
    }

    #[test]
    fn test_close_to_brute_force() {
        let graph = GridGraph::from_ascii(&[
            "S.........",
            "..........",
            "...##.....",
            "...##.....",
            "..........",
            ".......#..",
            "..........",
            ".........E",
        ])
        .unwrap();
        let dist = obstacle_distances(&graph);
        for p in graph.free_points() {
            let expected = brute_force(&graph, p);
            let got = dist[graph.index(p).unwrap()];
            // Propagation never undershoots and stays within a fraction of a cell.
            assert!(
                got >= expected - 1e-9 && got - expected < 0.25,
                "clearance at {p}: got {got}, expected {expected}"
            );
        }
    }
}
