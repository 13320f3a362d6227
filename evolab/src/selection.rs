//! Parent selection policies.
use crate::Individual;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chooses a parent from a population.
pub trait SelectionPolicy {
    /// Returns the selected individual.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a [Individual],
        rng: &mut R,
    ) -> &'a Individual;
}

/// Tournament selection: draws `size` individuals uniformly
/// with replacement and keeps the fittest. Ties go to the
/// earliest draw.
///
/// A tournament of size 1 is a uniform random choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    size: usize,
}

impl Tournament {
    /// Returns a tournament of the given size. A size of
    /// zero is treated as 1.
    pub fn new(size: usize) -> Tournament {
        Tournament { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl SelectionPolicy for Tournament {
    fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a [Individual],
        rng: &mut R,
    ) -> &'a Individual {
        let mut best = &population[rng.gen_range(0..population.len())];
        for _ in 1..self.size {
            let competitor = &population[rng.gen_range(0..population.len())];
            if competitor.fitness() > best.fitness() {
                best = competitor;
            }
        }
        best
    }
}

/// Uniform random choice, ignoring fitness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformRandom;

impl SelectionPolicy for UniformRandom {
    fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a [Individual],
        rng: &mut R,
    ) -> &'a Individual {
        &population[rng.gen_range(0..population.len())]
    }
}
