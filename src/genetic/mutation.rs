//! Per-gene mutation with the adaptive rate boost (ยง4.F step 5).

use crate::random::RandomSource;
use crate::state::{Gene, Individual};

/// Mutates `individual` in place: each gene's `r` and `p` are
/// independently replaced with a fresh uniform draw with probability
/// `rate`.
pub fn mutate(individual: &mut Individual, rate: f64, source: &RandomSource) {
    let genes: Vec<Gene> = individual
        .genes()
        .iter()
        .map(|gene| {
            let r = if source.next_f64() < rate {
                source.next_f64()
            } else {
                gene.r
            };
            let p = if source.next_f64() < rate {
                source.next_f64()
            } else {
                gene.p
            };
            Gene::new(r, p)
        })
        .collect();
    *individual = Individual::new(genes).expect("mutation preserves gene count");
}

/// Applies the adaptive mutation-rate boost: when the population's score
/// standard deviation `sigma` is below `threshold`, the base rate is
/// scaled up so a converging population keeps exploring. Formula and
/// scale factor are load-bearing: reproduced exactly, not approximated.
pub fn adaptive_rate(base_rate: f64, threshold: f64, sigma: f64) -> f64 {
    if sigma < threshold {
        base_rate * (threshold - sigma + 1.0) * 100.0
    } else {
        base_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_never_mutates() {
        let mut individual = Individual::constant(0.3, 0.7);
        let before = individual.clone();
        mutate(&mut individual, 0.0, &RandomSource::seeded(5));
        assert_eq!(individual, before);
    }

    #[test]
    fn full_rate_always_redraws_every_gene() {
        let mut individual = Individual::constant(0.3, 0.7);
        mutate(&mut individual, 1.0, &RandomSource::seeded(6));
        assert!(individual.genes().iter().any(|g| g.r != 0.3 || g.p != 0.7));
    }

    #[test]
    fn adaptive_rate_boosts_below_threshold_and_is_unchanged_above() {
        let base = 0.02;
        assert_eq!(adaptive_rate(base, 0.1, 0.5), base);
        let boosted = adaptive_rate(base, 0.1, 0.05);
        assert_eq!(boosted, base * (0.1 - 0.05 + 1.0) * 100.0);
        assert!(boosted > base);
    }
}
