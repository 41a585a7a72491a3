//! The three crossover schemes the engine rotates through (ยง4.F). Which
//! scheme applies to a given pair depends on a counter that advances
//! once per crossover and is **not** reset between generations.

use crate::random::RandomSource;
use crate::state::{Gene, Individual};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    LinearInterpolation,
    RandomGene,
    Alternate,
}

impl Scheme {
    /// Maps a monotonically increasing step counter onto the three
    /// schemes, `step % 3`.
    pub fn from_step(step: usize) -> Self {
        match step % 3 {
            0 => Scheme::LinearInterpolation,
            1 => Scheme::RandomGene,
            _ => Scheme::Alternate,
        }
    }
}

/// Produces two children from `p1` and `p2` under `scheme`.
pub fn apply(scheme: Scheme, p1: &Individual, p2: &Individual, source: &RandomSource) -> (Individual, Individual) {
    let genes = match scheme {
        Scheme::LinearInterpolation => linear_interpolation(p1, p2, source),
        Scheme::RandomGene => random_gene(p1, p2, source),
        Scheme::Alternate => alternate(p1, p2),
    };
    let (c1_genes, c2_genes) = genes;
    (
        Individual::new(c1_genes).expect("crossover preserves gene count"),
        Individual::new(c2_genes).expect("crossover preserves gene count"),
    )
}

fn linear_interpolation(
    p1: &Individual,
    p2: &Individual,
    source: &RandomSource,
) -> (Vec<Gene>, Vec<Gene>) {
    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p1.len());
    for i in 0..p1.len() {
        let r = source.next_f64();
        let g1 = p1.gene(i);
        let g2 = p2.gene(i);
        c1.push(Gene::new(
            r * g1.r + (1.0 - r) * g2.r,
            r * g1.p + (1.0 - r) * g2.p,
        ));
        c2.push(Gene::new(
            (1.0 - r) * g1.r + r * g2.r,
            (1.0 - r) * g1.p + r * g2.p,
        ));
    }
    (c1, c2)
}

fn random_gene(p1: &Individual, p2: &Individual, source: &RandomSource) -> (Vec<Gene>, Vec<Gene>) {
    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p1.len());
    for i in 0..p1.len() {
        if source.next_f64() < 0.5 {
            c1.push(p2.gene(i));
            c2.push(p1.gene(i));
        } else {
            c1.push(p1.gene(i));
            c2.push(p2.gene(i));
        }
    }
    (c1, c2)
}

fn alternate(p1: &Individual, p2: &Individual) -> (Vec<Gene>, Vec<Gene>) {
    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p1.len());
    for i in 0..p1.len() {
        if i % 2 == 0 {
            c1.push(p1.gene(i));
            c2.push(p2.gene(i));
        } else {
            c1.push(p2.gene(i));
            c2.push(p1.gene(i));
        }
    }
    (c1, c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents() -> (Individual, Individual) {
        (Individual::constant(0.0, 0.0), Individual::constant(1.0, 1.0))
    }

    #[test]
    fn step_rotates_through_all_three_schemes() {
        assert_eq!(Scheme::from_step(0), Scheme::LinearInterpolation);
        assert_eq!(Scheme::from_step(1), Scheme::RandomGene);
        assert_eq!(Scheme::from_step(2), Scheme::Alternate);
        assert_eq!(Scheme::from_step(3), Scheme::LinearInterpolation);
    }

    #[test]
    fn alternate_splits_genes_evenly_between_children() {
        let (p1, p2) = parents();
        let (c1, c2) = apply(Scheme::Alternate, &p1, &p2, &RandomSource::seeded(1));
        for i in 0..c1.len() {
            if i % 2 == 0 {
                assert_eq!(c1.gene(i), p1.gene(i));
                assert_eq!(c2.gene(i), p2.gene(i));
            } else {
                assert_eq!(c1.gene(i), p2.gene(i));
                assert_eq!(c2.gene(i), p1.gene(i));
            }
        }
    }

    #[test]
    fn linear_interpolation_children_stay_within_parent_bounds() {
        let (p1, p2) = parents();
        let (c1, c2) = apply(
            Scheme::LinearInterpolation,
            &p1,
            &p2,
            &RandomSource::seeded(2),
        );
        for i in 0..c1.len() {
            assert!((0.0..=1.0).contains(&c1.gene(i).r));
            assert!((0.0..=1.0).contains(&c2.gene(i).r));
        }
    }
}
