//! Ready-made simulations on top of [`evolab`].
//!
//! - [`color`] evolves RGB triples towards a target color
//!   with elitist breeding.
//! - [`tributes`] runs a competitive arena: tributes with
//!   five survival traits fight under a weighted environment,
//!   and the survivors breed the next generation.
//!
//! # Example usage: a short arena run
//! ```
//! use evolab_sims::tributes::{self, Environments};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let forest = Environments::standard().get("forest").cloned().unwrap();
//! let mut arena = tributes::engine(forest, StdRng::seed_from_u64(7)).unwrap();
//! for _ in 0..3 {
//!     let snapshot = arena.tick().unwrap();
//!     assert_eq!(snapshot.living_count(), tributes::INITIAL_POPULATION);
//! }
//! assert_eq!(arena.deaths(), 3 * 12);
//! ```
pub mod color;
pub mod tributes;
