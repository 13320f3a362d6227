//! A small engine for interactive, generation-based
//! evolutionary simulations.
//!
//! A population of fixed-arity numeric individuals is scored
//! by a pluggable [`FitnessFunction`] against a mutable
//! evaluation context, and replaced generation over generation.
//! Two breeding regimes are supported:
//!
//! - **Elitist**: the best individuals are carried over
//!   unchanged and the rest of the generation is bred from
//!   tournament-selected parents.
//! - **Competitive**: individuals first fight pairwise, with
//!   some luck, until a fixed number survive; survivors age and
//!   breed the population back to full size.
//!
//! The engine is driven externally: a controller calls
//! [`EvolutionEngine::tick`] at whatever pace it likes and
//! renders the returned [`Snapshot`]. All randomness comes from
//! the `Rng` handed to the engine, so seeded runs are
//! reproducible.
//!
//! # Example usage: evolving a number towards a target
//! ```
//! use evolab::{
//!     BlendCrossover, Breeding, EngineConfig, EvolutionEngine, FitnessFunction, Mutation,
//!     TraitSchema,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Rewards values close to the target held in the context.
//! struct Closeness;
//!
//! impl FitnessFunction for Closeness {
//!     type Context = f32;
//!
//!     fn evaluate(&self, traits: &[f32], target: &f32) -> f32 {
//!         1.0 / (1.0 + (traits[0] - target).abs())
//!     }
//! }
//!
//! let schema = TraitSchema::uniform(&["x"], 0.0, 100.0).unwrap();
//! let config = EngineConfig {
//!     population_size: 30,
//!     breeding: Breeding::Elitist { elitism: 1, tournament_size: 3 },
//!     history_capacity: 10,
//!     ..EngineConfig::zero()
//! };
//! let mut engine = EvolutionEngine::new(
//!     config,
//!     schema,
//!     Closeness,
//!     42.0,
//!     BlendCrossover::new(Mutation { rate: 0.2, magnitude: 5.0 }),
//!     StdRng::seed_from_u64(1),
//! )
//! .unwrap();
//!
//! let mut best = engine.best_fitness();
//! for _ in 0..50 {
//!     let snapshot = engine.tick().unwrap();
//!     // The elite survives every tick, so the best never regresses.
//!     assert!(snapshot.best_fitness >= best);
//!     best = snapshot.best_fitness;
//! }
//! assert_eq!(engine.generation(), 50);
//! ```

mod elimination;
mod engine;
mod fitness;
mod individual;
mod rng;
mod selection;
mod variation;

pub use elimination::{Contest, ContestElimination, ContestLog};
pub use engine::*;
pub use fitness::FitnessFunction;
pub use individual::{Individual, IndividualId, TraitBound, TraitSchema};
pub use selection::{SelectionPolicy, Tournament, UniformRandom};
pub use variation::{AveragingCrossover, BlendCrossover, Mutation, VariationPolicy};
