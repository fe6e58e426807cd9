//! Path ranking.

use super::Trace;
use std::cmp::Ordering;

/// Ranks paths by length, then turn count.
///
/// Lengths closer than `tolerance` count as equal, in which case the path
/// with fewer turns wins. Invalid paths rank below every valid one and
/// never improve on anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOrder {
    tolerance: f64,
}

impl Default for PathOrder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl PathOrder {
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// `Less` when `a` is preferred over `b`.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: Trace + ?Sized,
        B: Trace + ?Sized,
    {
        match (a.is_valid(), b.is_valid()) {
            (false, false) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (true, true) => {}
        }
        if (a.length() - b.length()).abs() < self.tolerance {
            a.turn_num().cmp(&b.turn_num())
        } else {
            a.length().total_cmp(&b.length())
        }
    }

    /// True if `candidate` strictly improves on `incumbent`.
    pub fn is_better<A, B>(&self, candidate: &A, incumbent: &B) -> bool
    where
        A: Trace + ?Sized,
        B: Trace + ?Sized,
    {
        candidate.is_valid() && self.compare(candidate, incumbent) == Ordering::Less
    }

    /// Index of the best valid path.
    ///
    /// `compare` is not transitive once lengths chain across the tolerance,
    /// so a pairwise scan would depend on input order. Instead the shortest
    /// valid length anchors a window of width `tolerance`; the path with the
    /// fewest turns inside it wins, the earliest among equals.
    pub fn best_index<T: Trace>(&self, paths: &[T]) -> Option<usize> {
        let shortest = paths
            .iter()
            .filter(|p| p.is_valid())
            .map(|p| p.length())
            .min_by(f64::total_cmp)?;
        let mut best: Option<usize> = None;
        for (i, path) in paths.iter().enumerate() {
            if !path.is_valid() || !self.within(path.length(), shortest) {
                continue;
            }
            match best {
                Some(b) if path.turn_num() >= paths[b].turn_num() => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the worst valid path, mirroring `best_index`: the longest
    /// valid length anchors the window, the most turns inside it lose, the
    /// latest among equals.
    pub fn worst_index<T: Trace>(&self, paths: &[T]) -> Option<usize> {
        let longest = paths
            .iter()
            .filter(|p| p.is_valid())
            .map(|p| p.length())
            .max_by(f64::total_cmp)?;
        let mut worst: Option<usize> = None;
        for (i, path) in paths.iter().enumerate() {
            if !path.is_valid() || !self.within(longest, path.length()) {
                continue;
            }
            match worst {
                Some(w) if path.turn_num() < paths[w].turn_num() => {}
                _ => worst = Some(i),
            }
        }
        worst
    }

    /// `upper` lies less than `tolerance` above `lower`, or equals it.
    fn within(&self, upper: f64, lower: f64) -> bool {
        upper == lower || upper - lower < self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSnapshot;

    fn path(length: f64, turn_num: usize) -> PathSnapshot {
        PathSnapshot {
            points: Vec::new(),
            length,
            turn_num,
            valid: true,
        }
    }

    #[test]
    fn test_length_dominates_outside_tolerance() {
        let order = PathOrder::default();
        assert!(order.is_better(&path(5.0, 9), &path(6.0, 0)));
        assert!(!order.is_better(&path(6.0, 0), &path(5.0, 9)));
    }

    #[test]
    fn test_turns_decide_within_tolerance() {
        let order = PathOrder::default();
        assert!(order.is_better(&path(5.65, 1), &path(5.60, 3)));
        assert!(!order.is_better(&path(5.60, 3), &path(5.65, 1)));
        assert!(!order.is_better(&path(5.60, 2), &path(5.65, 2)));
    }

    #[test]
    fn test_invalid_paths() {
        let order = PathOrder::default();
        let mut broken = path(1.0, 0);
        broken.valid = false;
        assert!(!order.is_better(&broken, &path(9.0, 9)));
        assert!(order.is_better(&path(9.0, 9), &broken));
        assert!(order.is_better(&path(9.0, 9), &PathSnapshot::unreached()));
        assert!(!order.is_better(&PathSnapshot::unreached(), &PathSnapshot::unreached()));
    }

    #[test]
    fn test_zero_tolerance_is_lexicographic() {
        let order = PathOrder::new(0.0);
        assert!(order.is_better(&path(5.0, 4), &path(5.01, 0)));
        assert!(order.is_better(&path(5.0, 0), &path(5.0, 1)));
    }

    #[test]
    fn test_selection_ignores_input_order() {
        // Grid lengths 12√2, 17 and 10 + 5√2 sit 0.03 and 0.07 apart, so
        // pairwise comparison cycles: x beats z, z beats y, y beats x.
        let sqrt2 = std::f64::consts::SQRT_2;
        let x = path(12.0 * sqrt2, 2);
        let y = path(17.0, 1);
        let z = path(10.0 + 5.0 * sqrt2, 0);
        let order = PathOrder::default();
        assert!(order.is_better(&x, &z));
        assert!(order.is_better(&z, &y));
        assert!(order.is_better(&y, &x));

        let permutations = [
            [&x, &y, &z],
            [&x, &z, &y],
            [&y, &x, &z],
            [&y, &z, &x],
            [&z, &x, &y],
            [&z, &y, &x],
        ];
        for paths in permutations {
            let best = order.best_index(&paths).unwrap();
            assert_eq!(paths[best], &y);
            // z anchors the worst window, and y inside it has more turns.
            let worst = order.worst_index(&paths).unwrap();
            assert_eq!(paths[worst], &y);
        }
    }

    #[test]
    fn test_best_among_refs_with_zero_tolerance() {
        let order = PathOrder::new(0.0);
        let a = path(5.0, 3);
        let b = path(5.0, 1);
        let c = path(5.01, 0);
        let refs = vec![&a, &b, &c];
        assert_eq!(order.best_index(&refs), Some(1));
        assert_eq!(order.worst_index(&refs), Some(2));
    }

    #[test]
    fn test_best_and_worst_index() {
        let order = PathOrder::default();
        let mut broken = path(0.5, 0);
        broken.valid = false;
        let paths = vec![path(7.0, 1), broken, path(6.0, 3), path(6.05, 1), path(9.0, 0)];
        assert_eq!(order.best_index(&paths), Some(3));
        assert_eq!(order.worst_index(&paths), Some(4));
        assert_eq!(order.best_index::<PathSnapshot>(&[]), None);
    }
}
