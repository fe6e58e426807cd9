//! Occupancy grid with precomputed 8-connected adjacency.

use super::point::{Direction, Point};
use crate::error::GraphError;

/// Orthogonal offsets, each tagged with its bit in the free-side mask.
const ORTHOGONAL: [(Direction, u8); 4] = [
    (Direction::North, 0b1000),
    (Direction::South, 0b0100),
    (Direction::East, 0b0010),
    (Direction::West, 0b0001),
];

/// Diagonals and the mask of the two orthogonal bridge cells they pass.
const DIAGONAL: [(Direction, u8); 4] = [
    (Direction::NorthEast, 0b1010),
    (Direction::NorthWest, 0b1001),
    (Direction::SouthEast, 0b0110),
    (Direction::SouthWest, 0b0101),
];

/// An immutable grid map.
///
/// Cells are either free or blocked. Adjacency is built once at
/// construction: orthogonal moves cost 1, diagonal moves cost √2, and a
/// diagonal move is only admitted when at least one of the two orthogonal
/// cells it squeezes past is free. Two blocked cells touching at a corner
/// therefore form a wall.
///
/// # Examples
///
/// ```
/// use u_antpath::grid::{GridGraph, Point};
///
/// let graph = GridGraph::from_ascii(&[
///     "S..",
///     ".#.",
///     "..E",
/// ]).unwrap();
///
/// assert_eq!(graph.start(), Point::new(0, 0));
/// assert!(!graph.contains(Point::new(1, 1)));
/// assert_eq!(graph.neighbors(Point::new(0, 0)).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GridGraph {
    width: usize,
    length: usize,
    blocked: Vec<bool>,
    start: Point,
    end: Point,
    adjacency: Vec<Vec<(Point, f64)>>,
}

impl GridGraph {
    /// Builds a graph from a blocked-flag matrix indexed `[x][y]`.
    pub fn new(matrix: Vec<Vec<bool>>, start: Point, end: Point) -> Result<Self, GraphError> {
        let width = matrix.len();
        let length = matrix.first().map_or(0, Vec::len);
        if width == 0 || length == 0 {
            return Err(GraphError::EmptyGrid);
        }

        let mut blocked = Vec::with_capacity(width * length);
        for (row, cells) in matrix.into_iter().enumerate() {
            if cells.len() != length {
                return Err(GraphError::RaggedRow {
                    row,
                    expected: length,
                    found: cells.len(),
                });
            }
            blocked.extend(cells);
        }

        let mut graph = Self {
            width,
            length,
            blocked,
            start,
            end,
            adjacency: Vec::new(),
        };
        graph.check_endpoint("start", start)?;
        graph.check_endpoint("end", end)?;
        graph.adjacency = graph.build_adjacency();
        Ok(graph)
    }

    /// Builds an obstacle-free `width × length` grid.
    pub fn open(width: usize, length: usize, start: Point, end: Point) -> Result<Self, GraphError> {
        Self::new(vec![vec![false; length]; width], start, end)
    }

    /// Parses a text map: `.` free, `#` blocked, `S` start, `E` end.
    ///
    /// Each string is one row (fixed `x`), characters run along `y`.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GraphError> {
        let mut matrix = Vec::with_capacity(rows.len());
        let mut start = None;
        let mut end = None;

        for (x, row) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (y, ch) in row.chars().enumerate() {
                let here = Point::new(x as i32, y as i32);
                let blocked = match ch {
                    '.' => false,
                    '#' => true,
                    'S' => {
                        start = Some(here);
                        false
                    }
                    'E' => {
                        end = Some(here);
                        false
                    }
                    other => return Err(GraphError::UnknownCell { ch: other, x, y }),
                };
                cells.push(blocked);
            }
            matrix.push(cells);
        }

        let start = start.ok_or(GraphError::MissingMarker("start"))?;
        let end = end.ok_or(GraphError::MissingMarker("end"))?;
        Self::new(matrix, start, end)
    }

    fn check_endpoint(&self, role: &'static str, point: Point) -> Result<(), GraphError> {
        if !self.in_bounds(point) {
            return Err(GraphError::OutOfBounds { role, point });
        }
        if !self.contains(point) {
            return Err(GraphError::Blocked { role, point });
        }
        Ok(())
    }

    fn build_adjacency(&self) -> Vec<Vec<(Point, f64)>> {
        let mut adjacency = vec![Vec::new(); self.blocked.len()];
        for (idx, slot) in adjacency.iter_mut().enumerate() {
            if self.blocked[idx] {
                continue;
            }
            let here = self.point_at(idx);
            let mut free_sides = 0u8;
            for (dir, bit) in ORTHOGONAL {
                let next = here + dir;
                if self.contains(next) {
                    free_sides |= bit;
                    slot.push((next, dir.step_cost()));
                }
            }
            for (dir, bridges) in DIAGONAL {
                if free_sides & bridges == 0 {
                    continue;
                }
                let next = here + dir;
                if self.contains(next) {
                    slot.push((next, dir.step_cost()));
                }
            }
        }
        adjacency
    }

    /// Extent of the `x` axis.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent of the `y` axis.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Total number of cells, free or blocked.
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.length
    }

    /// Row-major cell index, `None` outside the grid.
    pub fn index(&self, p: Point) -> Option<usize> {
        self.in_bounds(p)
            .then(|| p.x as usize * self.length + p.y as usize)
    }

    /// Inverse of [`index`](Self::index).
    pub fn point_at(&self, idx: usize) -> Point {
        Point::new((idx / self.length) as i32, (idx % self.length) as i32)
    }

    /// True when `p` is inside the grid and not blocked.
    pub fn contains(&self, p: Point) -> bool {
        self.index(p).is_some_and(|idx| !self.blocked[idx])
    }

    pub fn is_blocked(&self, p: Point) -> bool {
        self.index(p).is_some_and(|idx| self.blocked[idx])
    }

    /// Reachable neighbors of `p` with their step costs.
    ///
    /// Orthogonal neighbors come first, then admitted diagonals. Blocked or
    /// out-of-bounds points have no neighbors.
    pub fn neighbors(&self, p: Point) -> &[(Point, f64)] {
        match self.index(p) {
            Some(idx) => &self.adjacency[idx],
            None => &[],
        }
    }

    /// Cost of the edge `r → s`, if it exists.
    pub fn cost(&self, r: Point, s: Point) -> Option<f64> {
        self.neighbors(r)
            .iter()
            .find(|(n, _)| *n == s)
            .map(|&(_, c)| c)
    }

    /// Iterates over all free cells in row-major order.
    pub fn free_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, &b)| !b)
            .map(|(idx, _)| self.point_at(idx))
    }
}
