//! The evolutionary engine (ยง4.F): generation lifecycle -- init, select,
//! crossover, mutate, elitism.

pub mod crossover;
pub mod mutation;
pub mod selection;

use crate::parameters::Parameters;
use crate::random::RandomSource;
use crate::state::Individual;

/// Owns the crossover-scheme counter, which rotates through the three
/// schemes and, per the original implementation, is never reset between
/// generations.
pub struct Engine {
    population_size: usize,
    crossover_step: usize,
}

impl Engine {
    pub fn new(population_size: usize) -> Self {
        Self {
            population_size,
            crossover_step: 0,
        }
    }

    /// Builds generation 0: the seven deterministic constant-gene seeds,
    /// then uniform-random individuals filling out the rest.
    pub fn seed_initial_generation(&self, source: &RandomSource) -> Vec<Individual> {
        let mut individuals: Vec<Individual> = Individual::seed_constants()
            .into_iter()
            .map(|(r, p)| Individual::constant(r, p))
            .collect();
        while individuals.len() < self.population_size {
            individuals.push(Individual::random(source));
        }
        individuals.truncate(self.population_size);
        individuals
    }

    /// Produces the next generation from `current` and its raw `scores`
    /// (same length, same order).
    pub fn next_generation(
        &mut self,
        current: &[Individual],
        scores: &[f64],
        params: &Parameters,
        source: &RandomSource,
    ) -> Vec<Individual> {
        let n = current.len();
        assert_eq!(n, scores.len(), "scores must match population size");

        // Rank indices by raw score descending, ties broken by lower index.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .expect("fitness scores are never NaN")
                .then(a.cmp(&b))
        });

        let elite_count = ((n as f64) * params.elitism_rate).floor() as usize;
        let elite_count = elite_count.min(n);
        let elite_indices = &order[..elite_count];

        let (s_min, s_max) = score_bounds(scores);
        let normalized: Vec<f64> = scores
            .iter()
            .map(|&s| (s - s_min) / (s_max - s_min))
            .collect();

        let mut selection_weights = normalized.clone();
        for &index in elite_indices {
            selection_weights[index] *= params.elite_multiplier;
        }
        let total: f64 = selection_weights.iter().sum();

        let mutation_rate = mutation::adaptive_rate(
            params.mutation_rate,
            params.stdev_threshold,
            population_stdev(&normalized),
        );

        let mut next = Vec::with_capacity(n);
        for &index in elite_indices {
            next.push(current[index].clone());
        }
        // Rank-0 (next[0], the single overall best) is exempt so the best
        // individual carries forward bit-identical between generations.
        for individual in next.iter_mut().skip(1) {
            mutation::mutate(individual, mutation_rate, source);
        }

        while next.len() < n {
            let (p1, p2) = selection::select_pair(&selection_weights, total, source);
            let scheme = self.advance_crossover_scheme();
            let (mut c1, mut c2) = crossover::apply(scheme, &current[p1], &current[p2], source);
            mutation::mutate(&mut c1, mutation_rate, source);
            mutation::mutate(&mut c2, mutation_rate, source);

            next.push(c1);
            if next.len() < n {
                next.push(c2);
            }
        }

        next
    }

    fn advance_crossover_scheme(&mut self) -> crossover::Scheme {
        let scheme = crossover::Scheme::from_step(self.crossover_step);
        self.crossover_step += 1;
        scheme
    }
}

fn score_bounds(scores: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &s in scores {
        min = min.min(s);
        max = max.max(s);
    }
    if min == max { (0.0, 1.0) } else { (min, max) }
}

fn population_stdev(normalized: &[f64]) -> f64 {
    let n = normalized.len() as f64;
    let mean = normalized.iter().sum::<f64>() / n;
    let variance = normalized.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn initial_generation_starts_with_the_seven_deterministic_seeds() {
        let engine = Engine::new(50);
        let source = RandomSource::seeded(1);
        let generation = engine.seed_initial_generation(&source);
        assert_eq!(generation.len(), 50);
        for (individual, (r, p)) in generation.iter().zip(Individual::seed_constants()) {
            assert_eq!(individual.gene(0), crate::state::Gene::new(r, p));
        }
    }

    #[test]
    fn next_generation_preserves_population_size() {
        let mut engine = Engine::new(20);
        let source = RandomSource::seeded(2);
        let current = engine.seed_initial_generation(&source);
        let scores: Vec<f64> = (0..current.len()).map(|i| i as f64).collect();
        let next = engine.next_generation(&current, &scores, &params(), &source);
        assert_eq!(next.len(), current.len());
    }

    #[test]
    fn rank_zero_elite_carries_forward_unmutated() {
        let mut engine = Engine::new(20);
        let source = RandomSource::seeded(3);
        let current = engine.seed_initial_generation(&source);
        let mut scores: Vec<f64> = vec![0.0; current.len()];
        scores[5] = 100.0; // individual 5 is the clear best
        let next = engine.next_generation(&current, &scores, &params(), &source);
        assert_eq!(next[0], current[5]);
    }

    #[test]
    fn crossover_step_keeps_advancing_across_generations() {
        let mut engine = Engine::new(10);
        let source = RandomSource::seeded(4);
        let current = engine.seed_initial_generation(&source);
        let scores: Vec<f64> = (0..current.len()).map(|i| i as f64).collect();

        let step_before = engine.crossover_step;
        let _ = engine.next_generation(&current, &scores, &params(), &source);
        let step_after_one = engine.crossover_step;
        let _ = engine.next_generation(&current, &scores, &params(), &source);
        let step_after_two = engine.crossover_step;

        assert!(step_after_one > step_before);
        assert!(step_after_two > step_after_one);
    }
}
