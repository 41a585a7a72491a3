//! Roulette-wheel parent selection over normalized, elite-boosted scores.

use crate::random::RandomSource;

/// Draws two independent thresholds in `[0, total)` and walks the prefix
/// sum of `weights` to find each threshold's parent index. Parents may
/// repeat.
pub fn select_pair(weights: &[f64], total: f64, source: &RandomSource) -> (usize, usize) {
    (
        select_one(weights, total, source),
        select_one(weights, total, source),
    )
}

fn select_one(weights: &[f64], total: f64, source: &RandomSource) -> usize {
    let mut threshold = source.next_f64() * total;
    for (index, &weight) in weights.iter().enumerate() {
        threshold -= weight;
        if threshold <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_returns_an_index_in_bounds() {
        let source = RandomSource::seeded(3);
        let weights = vec![0.1, 0.4, 0.2, 0.3];
        let total: f64 = weights.iter().sum();
        for _ in 0..1000 {
            let (p1, p2) = select_pair(&weights, total, &source);
            assert!(p1 < weights.len());
            assert!(p2 < weights.len());
        }
    }

    #[test]
    fn a_single_candidate_with_all_the_weight_is_always_selected() {
        let source = RandomSource::seeded(9);
        let weights = vec![0.0, 0.0, 1.0, 0.0];
        for _ in 0..100 {
            let (p1, p2) = select_pair(&weights, 1.0, &source);
            assert_eq!(p1, 2);
            assert_eq!(p2, 2);
        }
    }
}
