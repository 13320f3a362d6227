//! Evolving RGB triples towards a target color.
use evolab::{
    BlendCrossover, Breeding, ConfigError, EngineConfig, EvolutionEngine, FitnessFunction,
    Individual, Mutation, TraitSchema,
};

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

pub const POPULATION_SIZE: usize = 20;
pub const ELITISM: usize = 1;
pub const TOURNAMENT_SIZE: usize = 3;
pub const MUTATION_RATE: f32 = 0.1;
pub const MUTATION_MAGNITUDE: f32 = 30.0;
pub const CHANNEL_MAX: f32 = 255.0;
pub const HISTORY_CAPACITY: usize = 50;

/// Names of the color traits, in storage order.
pub const CHANNELS: [&str; 3] = ["r", "g", "b"];

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Returns a uniformly random color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
        Rgb::new(rng.gen(), rng.gen(), rng.gen())
    }

    /// Rounds trait values to the nearest color. Missing or
    /// out-of-range channels are clamped.
    pub fn from_traits(traits: &[f32]) -> Rgb {
        let channel = |i: usize| {
            traits
                .get(i)
                .map_or(0, |v| v.round().clamp(0.0, CHANNEL_MAX) as u8)
        };
        Rgb::new(channel(0), channel(1), channel(2))
    }

    /// Returns the color as trait values.
    pub fn to_traits(self) -> Vec<f32> {
        vec![self.r as f32, self.g as f32, self.b as f32]
    }

    /// Returns the individual's traits as a color.
    pub fn of(individual: &Individual) -> Rgb {
        Rgb::from_traits(individual.traits())
    }
}

/// Formats as `#rrggbb`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// `1 - distance / max_distance`, where distance is the
/// Euclidean distance to the target in RGB space. Lies in
/// `[0, 1]` and is 1 only for an exact match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorMatch;

impl ColorMatch {
    /// Distance between black and white.
    pub fn max_distance() -> f32 {
        (3.0 * CHANNEL_MAX * CHANNEL_MAX).sqrt()
    }
}

impl FitnessFunction for ColorMatch {
    type Context = Rgb;

    fn evaluate(&self, traits: &[f32], target: &Rgb) -> f32 {
        let distance = traits
            .iter()
            .zip([target.r, target.g, target.b])
            .map(|(value, channel)| {
                let d = value - channel as f32;
                d * d
            })
            .sum::<f32>()
            .sqrt();
        (1.0 - distance / Self::max_distance()).clamp(0.0, 1.0)
    }

    fn arity(&self) -> Option<usize> {
        Some(CHANNELS.len())
    }
}

pub type ColorEngine<R> = EvolutionEngine<ColorMatch, BlendCrossover, R>;

/// Returns the trait schema: three channels in `[0, 255]`.
pub fn schema() -> Result<TraitSchema, ConfigError> {
    TraitSchema::uniform(&CHANNELS, 0.0, CHANNEL_MAX)
}

/// Returns the standard engine configuration.
pub fn config() -> EngineConfig {
    EngineConfig {
        population_size: POPULATION_SIZE,
        breeding: Breeding::Elitist {
            elitism: ELITISM,
            tournament_size: TOURNAMENT_SIZE,
        },
        history_capacity: HISTORY_CAPACITY,
        ..EngineConfig::zero()
    }
}

/// Returns the standard mutation parameters.
pub fn mutation() -> Mutation {
    Mutation {
        rate: MUTATION_RATE,
        magnitude: MUTATION_MAGNITUDE,
    }
}

/// Creates a color engine with the standard parameters,
/// seeded with a random population.
pub fn engine<R: Rng>(target: Rgb, rng: R) -> Result<ColorEngine<R>, ConfigError> {
    info!("building color engine targeting {}", target);
    EvolutionEngine::new(
        config(),
        schema()?,
        ColorMatch,
        target,
        BlendCrossover::new(mutation()),
        rng,
    )
}
