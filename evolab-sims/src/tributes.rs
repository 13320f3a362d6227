//! A competitive arena of tributes: individuals with five
//! survival traits fight pairwise each generation, and the
//! survivors repopulate the arena.
use evolab::{
    AveragingCrossover, Breeding, ConfigError, Contest, EngineConfig, EvolutionEngine,
    FitnessFunction, Individual, IndividualId, Mutation, TraitSchema,
};

use ahash::RandomState;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

pub const INITIAL_POPULATION: usize = 24;
pub const SURVIVORS_PER_GENERATION: usize = 12;
pub const MUTATION_RATE: f32 = 0.15;
pub const MUTATION_MAGNITUDE: f32 = 20.0;
pub const LUCK: f32 = 30.0;
pub const TRAIT_MAX: f32 = 100.0;
pub const CONTEST_LOG_CAPACITY: usize = 5;
pub const HISTORY_CAPACITY: usize = 50;

/// Names of the tribute traits, in storage order.
pub const TRAIT_NAMES: [&str; 5] = ["combat", "stealth", "speed", "survival", "intelligence"];

/// District names, indexed by lineage.
pub const DISTRICTS: [&str; 12] = [
    "Agriculture",
    "Masonry",
    "Technology",
    "Fishing",
    "Power",
    "Transportation",
    "Lumber",
    "Textiles",
    "Grain",
    "Livestock",
    "Electronics",
    "Mining",
];

/// A named set of per-trait multipliers, in
/// [`TRAIT_NAMES`] order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub weights: [f32; 5],
}

impl Environment {
    pub fn new(name: impl Into<String>, weights: [f32; 5]) -> Environment {
        Environment {
            name: name.into(),
            weights,
        }
    }

    /// Every trait weighted equally.
    pub fn balanced() -> Environment {
        Environment::new("Balanced Arena", [1.0; 5])
    }

    pub fn forest() -> Environment {
        Environment::new("Dense Forest", [0.7, 1.5, 0.8, 1.3, 1.1])
    }

    pub fn desert() -> Environment {
        Environment::new("Desert Wasteland", [1.1, 0.6, 1.2, 1.8, 1.0])
    }

    pub fn urban() -> Environment {
        Environment::new("Ruined City", [1.3, 1.0, 1.4, 0.8, 1.3])
    }

    pub fn arctic() -> Environment {
        Environment::new("Frozen Tundra", [0.9, 0.8, 0.7, 2.0, 1.2])
    }

    /// Returns the weight applied to the named trait.
    pub fn weight(&self, name: &str) -> Option<f32> {
        TRAIT_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.weights[i])
    }
}

/// Formats as the name followed by every trait weight.
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.name)?;
        for (i, name) in TRAIT_NAMES.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} x{}", name, self.weight(name).unwrap_or(0.0))?;
        }
        write!(f, ")")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::balanced()
    }
}

/// Environments available by key.
#[derive(Clone, Debug)]
pub struct Environments {
    presets: HashMap<String, Environment, RandomState>,
}

impl Environments {
    /// Creates an empty registry.
    pub fn new() -> Environments {
        Environments {
            presets: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Returns the registry of built-in presets: `balanced`,
    /// `forest`, `desert`, `urban` and `arctic`.
    pub fn standard() -> Environments {
        let mut environments = Environments::new();
        environments.insert("balanced", Environment::balanced());
        environments.insert("forest", Environment::forest());
        environments.insert("desert", Environment::desert());
        environments.insert("urban", Environment::urban());
        environments.insert("arctic", Environment::arctic());
        environments
    }

    /// Registers an environment, returning the one previously
    /// stored under `key`, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        environment: Environment,
    ) -> Option<Environment> {
        self.presets.insert(key.into(), environment)
    }

    pub fn get(&self, key: &str) -> Option<&Environment> {
        self.presets.get(key)
    }

    /// Returns the registered keys in alphabetical order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for Environments {
    fn default() -> Self {
        Environments::standard()
    }
}

/// `sum(trait * weight) / 5` under the active environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentWeighted;

impl FitnessFunction for EnvironmentWeighted {
    type Context = Environment;

    fn evaluate(&self, traits: &[f32], environment: &Environment) -> f32 {
        traits
            .iter()
            .zip(environment.weights)
            .map(|(value, weight)| value * weight)
            .sum::<f32>()
            / TRAIT_NAMES.len() as f32
    }

    fn arity(&self) -> Option<usize> {
        Some(TRAIT_NAMES.len())
    }

    fn validate_context(&self, environment: &Environment) -> Result<(), ConfigError> {
        match environment
            .weights
            .iter()
            .zip(TRAIT_NAMES)
            .find(|(w, _)| !w.is_finite() || **w < 0.0)
        {
            Some((weight, name)) => Err(ConfigError::InvalidContext(format!(
                "{} weight {} of environment {:?} must be finite and non-negative",
                name, weight, environment.name
            ))),
            None => Ok(()),
        }
    }
}

pub type TributeEngine<R> = EvolutionEngine<EnvironmentWeighted, AveragingCrossover, R>;

/// Returns the display name of the tribute with the given id.
pub fn tribute_name(id: IndividualId) -> String {
    format!("Tribute-{}", id)
}

/// Returns the district a tribute belongs to.
pub fn district(tribute: &Individual) -> Option<&'static str> {
    tribute.lineage().and_then(|l| DISTRICTS.get(l).copied())
}

/// Renders a contest with tribute names.
pub fn describe_contest(contest: &Contest) -> String {
    format!(
        "{} defeated {} ({:.1} vs {:.1})",
        tribute_name(contest.winner),
        tribute_name(contest.loser),
        contest.winner_fitness,
        contest.loser_fitness
    )
}

/// Returns the trait schema: five traits in `[0, 100]`.
pub fn schema() -> Result<TraitSchema, ConfigError> {
    TraitSchema::uniform(&TRAIT_NAMES, 0.0, TRAIT_MAX)
}

/// Returns the standard arena configuration.
pub fn config() -> EngineConfig {
    EngineConfig {
        population_size: INITIAL_POPULATION,
        breeding: Breeding::Competitive {
            survivors: SURVIVORS_PER_GENERATION,
            luck: LUCK,
        },
        lineages: DISTRICTS.len(),
        contest_log_capacity: CONTEST_LOG_CAPACITY,
        history_capacity: HISTORY_CAPACITY,
    }
}

/// Returns the standard mutation parameters.
pub fn mutation() -> Mutation {
    Mutation {
        rate: MUTATION_RATE,
        magnitude: MUTATION_MAGNITUDE,
    }
}

/// Creates an arena with the standard parameters, seeded
/// with random tributes from random districts.
pub fn engine<R: Rng>(environment: Environment, rng: R) -> Result<TributeEngine<R>, ConfigError> {
    info!("building tribute arena in {}", environment);
    EvolutionEngine::new(
        config(),
        schema()?,
        EnvironmentWeighted,
        environment,
        AveragingCrossover::new(mutation()),
        rng,
    )
}
