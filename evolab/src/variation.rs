//! Crossover and mutation operators.
//!
//! Two crossover flavours are provided and are deliberately
//! not interchangeable: [`BlendCrossover`] draws one blend
//! factor per child, while [`AveragingCrossover`] takes the
//! plain mean of both parents.
use crate::engine::ConfigError;
use crate::rng;
use crate::TraitSchema;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-trait uniform perturbation, applied independently
/// to each trait with probability `rate` and clamped back
/// into the trait's bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    /// Chance that any given trait is perturbed.
    pub rate: f32,
    /// Half-width of the perturbation interval.
    pub magnitude: f32,
}

impl Mutation {
    /// Returns a mutation that never fires.
    pub const fn zero() -> Mutation {
        Mutation {
            rate: 0.0,
            magnitude: 0.0,
        }
    }

    /// # Errors
    /// Fails if `rate` is outside `[0, 1]` or `magnitude`
    /// is negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.rate) {
            return Err(ConfigError::InvalidMutationRate(self.rate));
        }
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(ConfigError::InvalidMutationMagnitude(self.magnitude));
        }
        Ok(())
    }

    /// Mutates `traits` in place.
    pub fn apply<R: Rng + ?Sized>(&self, traits: &mut [f32], schema: &TraitSchema, rng: &mut R) {
        for (value, bound) in traits.iter_mut().zip(schema.bounds()) {
            if rng::chance(rng, self.rate) {
                *value = bound.clamp(*value + rng::symmetric(rng, self.magnitude));
            }
        }
    }
}

/// Produces a child's traits from two parents.
pub trait VariationPolicy {
    /// Combines the parents' traits.
    fn crossover<R: Rng + ?Sized>(&self, parent1: &[f32], parent2: &[f32], rng: &mut R) -> Vec<f32>;

    /// Returns the mutation applied after crossover.
    fn mutation(&self) -> &Mutation;

    /// Replaces the mutation applied after crossover.
    fn set_mutation(&mut self, mutation: Mutation);

    /// Crosses the parents, mutates the result, and clamps
    /// it into `schema`.
    fn vary<R: Rng + ?Sized>(
        &self,
        parent1: &[f32],
        parent2: &[f32],
        schema: &TraitSchema,
        rng: &mut R,
    ) -> Vec<f32> {
        let mut child = self.crossover(parent1, parent2, rng);
        schema.clamp(&mut child);
        self.mutation().apply(&mut child, schema, rng);
        child
    }
}

/// `alpha * parent1 + (1 - alpha) * parent2` for every trait,
/// with a single `alpha ~ U(0, 1)` drawn per child.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendCrossover {
    pub mutation: Mutation,
}

impl BlendCrossover {
    pub fn new(mutation: Mutation) -> BlendCrossover {
        BlendCrossover { mutation }
    }
}

impl VariationPolicy for BlendCrossover {
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &[f32],
        parent2: &[f32],
        rng: &mut R,
    ) -> Vec<f32> {
        let alpha = rng.gen::<f32>();
        parent1
            .iter()
            .zip(parent2)
            .map(|(a, b)| alpha * a + (1.0 - alpha) * b)
            .collect()
    }

    fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    fn set_mutation(&mut self, mutation: Mutation) {
        self.mutation = mutation;
    }
}

/// `(parent1 + parent2) / 2` for every trait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AveragingCrossover {
    pub mutation: Mutation,
}

impl AveragingCrossover {
    pub fn new(mutation: Mutation) -> AveragingCrossover {
        AveragingCrossover { mutation }
    }
}

impl VariationPolicy for AveragingCrossover {
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &[f32],
        parent2: &[f32],
        _rng: &mut R,
    ) -> Vec<f32> {
        parent1
            .iter()
            .zip(parent2)
            .map(|(a, b)| (a + b) / 2.0)
            .collect()
    }

    fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    fn set_mutation(&mut self, mutation: Mutation) {
        self.mutation = mutation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn schema() -> TraitSchema {
        TraitSchema::uniform(&["r", "g", "b"], 0.0, 255.0).unwrap()
    }

    #[test]
    fn mutation_validation() {
        assert!(Mutation::zero().validate().is_ok());
        assert!(Mutation { rate: 0.1, magnitude: 30.0 }.validate().is_ok());
        assert_eq!(
            Mutation { rate: 1.5, magnitude: 1.0 }.validate(),
            Err(ConfigError::InvalidMutationRate(1.5))
        );
        assert_eq!(
            Mutation { rate: 0.5, magnitude: -1.0 }.validate(),
            Err(ConfigError::InvalidMutationMagnitude(-1.0))
        );
        assert!(Mutation { rate: f32::NAN, magnitude: 1.0 }.validate().is_err());
    }

    #[test]
    fn blend_uses_one_factor_per_child() {
        let blend = BlendCrossover::new(Mutation::zero());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let child = blend.crossover(&[0.0, 0.0, 0.0], &[100.0, 200.0, 50.0], &mut rng);
            // child = (1 - alpha) * parent2, so every trait shares the same ratio.
            let ratio = child[0] / 100.0;
            assert!((child[1] / 200.0 - ratio).abs() < 1e-5);
            assert!((child[2] / 50.0 - ratio).abs() < 1e-5);
        }
    }

    #[test]
    fn averaging_is_the_plain_mean() {
        let average = AveragingCrossover::new(Mutation::zero());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            average.crossover(&[10.0, 0.0, 90.0], &[20.0, 100.0, 90.0], &mut rng),
            vec![15.0, 50.0, 90.0]
        );
    }

    #[test]
    fn zero_mutation_leaves_traits_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut traits = [1.0, 2.0, 3.0];
        Mutation::zero().apply(&mut traits, &schema(), &mut rng);
        assert_eq!(traits, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn certain_mutation_stays_within_magnitude_and_bounds() {
        let mutation = Mutation { rate: 1.0, magnitude: 30.0 };
        let schema = schema();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..1000 {
            let mut traits = [128.0, 0.0, 255.0];
            mutation.apply(&mut traits, &schema, &mut rng);
            assert!((traits[0] - 128.0).abs() <= 30.0);
            assert!(schema.conforms(&traits), "{:?}", traits);
        }
    }

    #[test]
    fn vary_keeps_children_in_bounds() {
        let schema = TraitSchema::uniform(&["a", "b"], 0.0, 100.0).unwrap();
        let policy = AveragingCrossover::new(Mutation { rate: 1.0, magnitude: 20.0 });
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..1000 {
            let child = policy.vary(&[0.0, 100.0], &[0.0, 100.0], &schema, &mut rng);
            assert!(schema.conforms(&child), "{:?}", child);
        }
    }
}
