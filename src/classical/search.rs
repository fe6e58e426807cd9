//! Best-first shortest path search.

use crate::grid::{GridGraph, Point};
use crate::path::ListPath;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest
/// `f_score` first, and the earliest pushed among equals.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: f64,
    g_score: f64,
    cell: usize,
    counter: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.counter.cmp(&self.counter))
    }
}

/// Dijkstra's algorithm from start to end.
///
/// Returns `None` when the end is unreachable.
///
/// ```
/// use u_antpath::classical::dijkstra;
/// use u_antpath::grid::GridGraph;
/// use u_antpath::path::Trace;
///
/// let graph = GridGraph::from_ascii(&["S..", "...", "..E"]).unwrap();
/// let path = dijkstra(&graph).unwrap();
/// assert!((path.length() - 2.0 * std::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
pub fn dijkstra(graph: &GridGraph) -> Option<ListPath> {
    search(graph, |_| 0.0)
}

/// A* with the octile distance to the end, which never overestimates on an
/// 8-connected grid with costs 1 and √2.
pub fn a_star(graph: &GridGraph) -> Option<ListPath> {
    let end = graph.end();
    search(graph, move |p| p.octile_distance(end))
}

fn search<H: Fn(Point) -> f64>(graph: &GridGraph, heuristic: H) -> Option<ListPath> {
    let start = graph.index(graph.start())?;
    let goal = graph.index(graph.end())?;

    let mut g_costs = vec![f64::INFINITY; graph.cell_count()];
    let mut parents: Vec<Option<usize>> = vec![None; graph.cell_count()];
    let mut closed = vec![false; graph.cell_count()];
    let mut open_set = BinaryHeap::new();
    let mut counter: u64 = 0;

    g_costs[start] = 0.0;
    open_set.push(OpenEntry {
        f_score: heuristic(graph.start()),
        g_score: 0.0,
        cell: start,
        counter,
    });

    while let Some(current) = open_set.pop() {
        if closed[current.cell] {
            continue;
        }
        if current.cell == goal {
            return Some(trace_back(graph, &parents, goal));
        }
        closed[current.cell] = true;

        let r = graph.point_at(current.cell);
        for &(s, cost) in graph.neighbors(r) {
            let Some(next) = graph.index(s) else {
                continue;
            };
            if closed[next] {
                continue;
            }
            let g = current.g_score + cost;
            if g < g_costs[next] {
                g_costs[next] = g;
                parents[next] = Some(current.cell);
                counter += 1;
                open_set.push(OpenEntry {
                    f_score: g + heuristic(s),
                    g_score: g,
                    cell: next,
                    counter,
                });
            }
        }
    }
    None
}

fn trace_back(graph: &GridGraph, parents: &[Option<usize>], goal: usize) -> ListPath {
    let mut cells = vec![goal];
    let mut cursor = goal;
    while let Some(parent) = parents[cursor] {
        cells.push(parent);
        cursor = parent;
    }
    ListPath::from_points(cells.into_iter().rev().map(|i| graph.point_at(i)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Trace;
    use std::f64::consts::SQRT_2;

    #[test]
    fn test_open_grid_diagonal() {
        let g = GridGraph::open(5, 5, Point::new(0, 0), Point::new(4, 4)).unwrap();
        for path in [dijkstra(&g).unwrap(), a_star(&g).unwrap()] {
            assert!((path.length() - 4.0 * SQRT_2).abs() < 1e-12);
            assert_eq!(path.points().first(), Some(&Point::new(0, 0)));
            assert_eq!(path.points().last(), Some(&Point::new(4, 4)));
        }
    }

    #[test]
    fn test_wall_detour_lengths_agree() {
        let g = GridGraph::from_ascii(&[
            "S.....",
            ".####.",
            ".#....",
            ".#.##.",
            ".#..#.",
            "....#E",
        ])
        .unwrap();
        let d = dijkstra(&g).unwrap();
        let a = a_star(&g).unwrap();
        assert!((d.length() - a.length()).abs() < 1e-9);
        assert!(d.is_valid());
        for w in d.points().windows(2) {
            assert!(g.cost(w[0], w[1]).is_some());
        }
    }

    #[test]
    fn test_start_equals_end() {
        let g = GridGraph::open(3, 3, Point::new(1, 1), Point::new(1, 1)).unwrap();
        let path = dijkstra(&g).unwrap();
        assert_eq!(path.points(), &[Point::new(1, 1)]);
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn test_unreachable_end() {
        let g = GridGraph::from_ascii(&["S#.", "##.", "..E"]).unwrap();
        assert!(dijkstra(&g).is_none());
        assert!(a_star(&g).is_none());
    }

    #[test]
    fn test_heap_pops_lowest_first() {
        let mut heap = BinaryHeap::new();
        for (i, f) in [3.0, 1.0, 2.0, 1.0].into_iter().enumerate() {
            heap.push(OpenEntry {
                f_score: f,
                g_score: 0.0,
                cell: i,
                counter: i as u64,
            });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.cell)).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}
