//! Grid coordinates and the eight step directions.

use std::fmt;
use std::ops::Add;

/// Cost of an orthogonal step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of a diagonal step.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// An integer grid coordinate.
///
/// `x` indexes the outer (row) dimension of the occupancy matrix and `y`
/// the inner one, so `matrix[x][y]` is the cell at `Point { x, y }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sign-normalized heading from `self` toward `other`.
    ///
    /// Returns `None` when both points coincide.
    pub fn direction_to(self, other: Point) -> Option<Direction> {
        Direction::from_offset((other.x - self.x).signum(), (other.y - self.y).signum())
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Octile distance: the length of the shortest 8-connected route on an
    /// empty grid (`√2·min + (max − min)`).
    pub fn octile_distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        let (long, short) = if dx > dy { (dx, dy) } else { (dy, dx) };
        DIAGONAL_COST * f64::from(short) + f64::from(long - short)
    }

    /// Chebyshev distance (number of king moves).
    pub fn chebyshev_distance(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, dir: Direction) -> Point {
        let (dx, dy) = dir.offset();
        Point::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// One of the eight unit steps of an 8-connected grid.
///
/// Variants are listed counter-clockwise starting from `+x`, with `+y`
/// pointing "north".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// All directions in counter-clockwise order.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Unit offset `(dx, dy)`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::North => (0, 1),
            Direction::NorthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
        }
    }

    /// Maps a sign pair back to a direction; `(0, 0)` and non-unit
    /// components yield `None`.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.offset() == (dx, dy))
    }

    fn ordinal(self) -> usize {
        self as usize
    }

    /// Rotates 45° counter-clockwise.
    pub fn rotate_left(self) -> Direction {
        Direction::ALL[(self.ordinal() + 1) % 8]
    }

    /// Rotates 45° clockwise.
    pub fn rotate_right(self) -> Direction {
        Direction::ALL[(self.ordinal() + 7) % 8]
    }

    /// Angular difference in 45° steps, from 0 (same heading) to 4
    /// (opposite heading).
    pub fn turn_steps(self, other: Direction) -> u8 {
        let d = self.ordinal().abs_diff(other.ordinal());
        d.min(8 - d) as u8
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// Travel cost of one step in this direction.
    pub fn step_cost(self) -> f64 {
        if self.is_diagonal() {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_is_sign_normalized() {
        let origin = Point::new(0, 0);
        assert_eq!(origin.direction_to(Point::new(5, 2)), Some(Direction::NorthEast));
        assert_eq!(origin.direction_to(Point::new(0, -3)), Some(Direction::South));
        assert_eq!(origin.direction_to(Point::new(-1, 4)), Some(Direction::NorthWest));
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn test_rotation_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_left().rotate_right(), dir);
            assert_eq!(dir.turn_steps(dir.rotate_left()), 1);
            assert_eq!(dir.turn_steps(dir.rotate_right()), 1);
        }
        assert_eq!(Direction::East.rotate_left(), Direction::NorthEast);
        assert_eq!(Direction::East.rotate_right(), Direction::SouthEast);
    }

    #[test]
    fn test_turn_steps() {
        assert_eq!(Direction::East.turn_steps(Direction::East), 0);
        assert_eq!(Direction::East.turn_steps(Direction::North), 2);
        assert_eq!(Direction::East.turn_steps(Direction::NorthWest), 3);
        assert_eq!(Direction::East.turn_steps(Direction::West), 4);
        assert_eq!(Direction::NorthEast.turn_steps(Direction::SouthWest), 4);
        assert_eq!(Direction::SouthEast.turn_steps(Direction::East), 1);
    }

    #[test]
    fn test_distances() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert!((a.octile_distance(b) - (3.0 * DIAGONAL_COST + 1.0)).abs() < 1e-12);
        assert_eq!(a.chebyshev_distance(b), 4);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn test_add_direction() {
        let p = Point::new(2, 2) + Direction::SouthWest;
        assert_eq!(p, Point::new(1, 1));
        assert!(Direction::SouthWest.is_diagonal());
        assert!(!Direction::West.is_diagonal());
        assert_eq!(Direction::West.step_cost(), ORTHOGONAL_COST);
    }
}
