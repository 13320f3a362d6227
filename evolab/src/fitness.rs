use crate::engine::ConfigError;
use crate::Individual;

use std::fmt;

/// An interface for scoring individuals against an
/// evaluation context (a target, an environment, ...).
///
/// Implementations must be pure: the same traits and
/// context always produce the same score.
pub trait FitnessFunction {
    /// The external configuration the score depends on.
    type Context: Clone + fmt::Debug;

    /// Returns the fitness of the given trait values.
    fn evaluate(&self, traits: &[f32], context: &Self::Context) -> f32;

    /// Number of traits the function reads, if fixed.
    /// Engines refuse schemas of a different length.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Checks a context before it is installed.
    fn validate_context(&self, _context: &Self::Context) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Evaluates an individual's current traits.
    fn evaluate_individual(&self, individual: &Individual, context: &Self::Context) -> f32 {
        self.evaluate(individual.traits(), context)
    }
}
