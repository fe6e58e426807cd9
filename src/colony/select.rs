//! Pseudo-random-proportional move selection.

use crate::grid::Point;
use rand::Rng;

/// Chooses one candidate from `(point, weight)` pairs.
///
/// Draws `q ~ U(0, 1)`. When `q < q0` the heaviest candidate is taken
/// (the first one in slice order among equals). Otherwise a candidate is
/// sampled with probability proportional to its weight, walking the slice
/// in order. Negative or NaN weights count as zero. Infinite weights are
/// certain: greedy takes the first of them and the roulette samples only
/// among them. When every weight is zero the choice is uniform.
///
/// Returns `None` only for an empty slice.
pub fn pseudo_random_proportional<R: Rng + ?Sized>(
    candidates: &[(Point, f64)],
    q0: f64,
    rng: &mut R,
) -> Option<Point> {
    match candidates.len() {
        0 => return None,
        1 => return Some(candidates[0].0),
        _ => {}
    }

    let mut weights: Vec<f64> = candidates.iter().map(|&(_, w)| clean(w)).collect();
    if weights.iter().any(|w| w.is_infinite()) {
        for w in &mut weights {
            *w = if w.is_infinite() { 1.0 } else { 0.0 };
        }
    }
    let mut total: f64 = weights.iter().sum();
    if total.is_infinite() {
        // Finite weights whose sum overflows.
        let max = weights.iter().copied().fold(0.0, f64::max);
        for w in &mut weights {
            *w /= max;
        }
        total = weights.iter().sum();
    }
    if !(total.is_finite() && total > 0.0) {
        let i = rng.random_range(0..candidates.len());
        return Some(candidates[i].0);
    }

    let q: f64 = rng.random();
    if q < q0 {
        return Some(candidates[greedy_index(&weights)].0);
    }

    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (&(p, _), &w) in candidates.iter().zip(&weights) {
        cumulative += w;
        if cumulative > threshold {
            return Some(p);
        }
    }
    // Rounding left the threshold past the final sum: take the last
    // candidate with any weight.
    candidates
        .iter()
        .zip(&weights)
        .rev()
        .find(|(_, &w)| w > 0.0)
        .map(|(&(p, _), _)| p)
}

fn clean(w: f64) -> f64 {
    if w.is_nan() || w < 0.0 {
        0.0
    } else {
        w
    }
}

/// First index of the maximum weight.
fn greedy_index(weights: &[f64]) -> usize {
    let mut best = 0;
    for (i, &w) in weights.iter().enumerate().skip(1) {
        if w > weights[best] {
            best = i;
        }
    }
    best
}
