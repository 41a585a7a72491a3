//! Ship state, per-turn decisions, and the gene encoding the evolutionary
//! engine searches over.

use crate::constants::{GENE_COUNT, MAX_POWER, MAX_ROTATION};
use crate::geometry::Point;

/// A ship tick: position, velocity, fuel, rotation, and current thrust.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub position: Point,
    pub velocity: Point,
    pub fuel: f64,
    pub rotate: f64,
    pub power: f64,
}

impl SimulationState {
    pub fn new(position: Point, velocity: Point, fuel: f64, rotate: f64, power: f64) -> Self {
        Self {
            position,
            velocity,
            fuel,
            rotate,
            power,
        }
    }
}

/// A target rotation and power the decoder commits to for one tick. Both
/// are integers, per the contest protocol, but carried as `f64` to avoid
/// churn converting back and forth with [`SimulationState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub rotate: i32,
    pub power: i32,
}

impl Decision {
    pub fn new(rotate: i32, power: i32) -> Self {
        Self { rotate, power }
    }
}

/// One turn's raw, undecoded genetic material: a pair of doubles in
/// `[0,1)` that the decoder (`crate::decoder`) turns into a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene {
    pub r: f64,
    pub p: f64,
}

impl Gene {
    pub fn new(r: f64, p: f64) -> Self {
        Self { r, p }
    }
}

/// A candidate control policy: exactly [`GENE_COUNT`] genes, one per turn.
/// Immutable once produced by the evolutionary engine; workers never
/// mutate an individual while simulating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genes: Vec<Gene>,
}

/// Error returned when constructing an [`Individual`] from a gene list of
/// the wrong length. `GENE_COUNT` is a protocol constant: callers must not
/// silently truncate or pad a mismatched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongGeneCount(pub usize);

impl std::fmt::Display for WrongGeneCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "individual requires exactly {GENE_COUNT} genes, got {}",
            self.0
        )
    }
}
impl std::error::Error for WrongGeneCount {}

impl Individual {
    /// Builds an individual from exactly `GENE_COUNT` genes.
    pub fn new(genes: Vec<Gene>) -> Result<Self, WrongGeneCount> {
        if genes.len() != GENE_COUNT {
            return Err(WrongGeneCount(genes.len()));
        }
        Ok(Self { genes })
    }

    /// The seven deterministic constant-gene seeds used to hedge the
    /// initial population against degenerate early runs (ยง4.F).
    pub fn seed_constants() -> [(f64, f64); 7] {
        [
            (0.5, 0.5),
            (0.0, 0.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 0.5),
            (0.5, 1.0),
        ]
    }

    /// Builds an individual whose every gene is the constant `(r,p)`.
    pub fn constant(r: f64, p: f64) -> Self {
        Self {
            genes: vec![Gene::new(r, p); GENE_COUNT],
        }
    }

    /// Builds an individual with genes drawn uniformly from `source`.
    pub fn random(source: &crate::random::RandomSource) -> Self {
        let genes = (0..GENE_COUNT)
            .map(|_| Gene::new(source.next_f64(), source.next_f64()))
            .collect();
        Self { genes }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene(&self, index: usize) -> Gene {
        self.genes[index]
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Left-shifts every gene by one slot, dropping the head gene and
    /// duplicating the tail gene into the vacated slot. Used by the online
    /// driver (ยง4.H) to realign a surviving individual's gene index with
    /// the next contest turn after emitting its head decision.
    pub fn shift_left(&mut self) {
        if self.genes.is_empty() {
            return;
        }
        self.genes.remove(0);
        let tail = *self.genes.last().unwrap();
        self.genes.push(tail);
    }
}

/// Clamps a target rotation to the legal range.
pub fn clamp_rotation(rotate: f64) -> f64 {
    rotate.clamp(-MAX_ROTATION, MAX_ROTATION)
}

/// Clamps a target power to `[0, min(MAX_POWER, fuel)]`.
pub fn clamp_power(power: f64, fuel: f64) -> f64 {
    power.clamp(0.0, MAX_POWER.min(fuel.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_gene_count() {
        let genes = vec![Gene::new(0.0, 0.0); GENE_COUNT - 1];
        assert!(Individual::new(genes).is_err());
    }

    #[test]
    fn shift_left_duplicates_tail() {
        let mut ind = Individual::constant(0.25, 0.75);
        ind.genes[GENE_COUNT - 1] = Gene::new(0.9, 0.1);
        ind.shift_left();
        assert_eq!(ind.len(), GENE_COUNT);
        assert_eq!(ind.gene(GENE_COUNT - 1), Gene::new(0.9, 0.1));
        assert_eq!(ind.gene(GENE_COUNT - 2), Gene::new(0.9, 0.1));
    }
}
