//! Path representations.
//!
//! Three traces cover the query patterns the planners need:
//!
//! - [`ListPath`]: append/pop at the tail with set-backed membership and an
//!   O(1) heading check; used for every single-colony tour
//! - [`LinkedPath`]: tail-growing chain with O(1) lookup of any point's
//!   link, so an agent can walk the segment between two points it
//!   visited; used for multi-tribe tours that rejoin a reference path
//! - [`RecordPath`]: indexed reference path with O(1) ordinal position and
//!   distance-from-start lookups
//!
//! All three maintain `length` and `turn_num` incrementally on every
//! mutation. [`trace_metrics`] replays a point sequence from scratch and is
//! the reference those counters must agree with.
//!
//! [`PathOrder`] ranks traces by length, breaking near-ties by turn count.

mod linked;
mod list;
mod order;
mod record;

pub use linked::{LinkNode, LinkedPath};
pub use list::ListPath;
pub use order::PathOrder;
pub use record::RecordPath;

use crate::grid::Point;

/// Read access shared by all path representations.
pub trait Trace {
    /// Sum of Euclidean step lengths. Infinite for an unreached sentinel.
    fn length(&self) -> f64;

    /// Number of interior points where the heading changes.
    fn turn_num(&self) -> usize;

    /// False for abandoned tours and for "no path yet" sentinels.
    fn is_valid(&self) -> bool;

    fn point_count(&self) -> usize;

    fn contains(&self, p: Point) -> bool;

    /// Points in travel order.
    fn to_points(&self) -> Vec<Point>;

    /// Owned copy for external consumers.
    fn snapshot(&self) -> PathSnapshot {
        PathSnapshot {
            points: self.to_points(),
            length: self.length(),
            turn_num: self.turn_num(),
            valid: self.is_valid(),
        }
    }
}

/// A detached view of a path, as handed to visualization or history
/// consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSnapshot {
    pub points: Vec<Point>,
    pub length: f64,
    pub turn_num: usize,
    pub valid: bool,
}

impl PathSnapshot {
    /// Sentinel for "no path found".
    pub fn unreached() -> Self {
        Self {
            points: Vec::new(),
            length: f64::INFINITY,
            turn_num: 0,
            valid: false,
        }
    }
}

impl Trace for PathSnapshot {
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
        self.points.contains(&p)
    }

    fn to_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

impl<T: Trace + ?Sized> Trace for &T {
    fn length(&self) -> f64 {
        (**self).length()
    }

    fn turn_num(&self) -> usize {
        (**self).turn_num()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn point_count(&self) -> usize {
        (**self).point_count()
    }

    fn contains(&self, p: Point) -> bool {
        (**self).contains(p)
    }

    fn to_points(&self) -> Vec<Point> {
        (**self).to_points()
    }
}

/// Recomputes `(length, turn_num)` from a point sequence.
pub fn trace_metrics(points: &[Point]) -> (f64, usize) {
    let length = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let turn_num = points
        .windows(3)
        .filter(|w| w[0].direction_to(w[1]) != w[1].direction_to(w[2]))
        .count();
    (length, turn_num)
}

/// Incremental turn bookkeeping shared by the path types: returns the new
/// heading and whether appending `next` after `last` starts a turn.
pub(crate) fn step_heading(
    heading: Option<crate::grid::Direction>,
    last: Point,
    next: Point,
) -> (Option<crate::grid::Direction>, bool) {
    let dir = last.direction_to(next);
    let turned = heading.is_some() && heading != dir;
    (dir, turned)
}
