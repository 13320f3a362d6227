use super::ConfigError;

use serde::{Deserialize, Serialize};

/// How each generation is bred from the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Breeding {
    /// The top `elitism` individuals are carried over
    /// unchanged; the rest of the generation is bred from
    /// parents chosen by tournaments of `tournament_size`.
    Elitist {
        elitism: usize,
        tournament_size: usize,
    },
    /// Living individuals fight until `survivors` remain.
    /// Survivors age by one generation and are kept; the
    /// rest of the generation is bred from survivors chosen
    /// uniformly at random. Each contestant adds a luck term
    /// in `[0, luck)` to its fitness.
    Competitive { survivors: usize, luck: f32 },
}

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Size of the population after every tick.
    pub population_size: usize,
    /// Breeding regime.
    pub breeding: Breeding,
    /// Number of distinct lineage tags. If non-zero, seeded
    /// individuals get a uniformly random tag and children
    /// inherit one of their parents' tags.
    pub lineages: usize,
    /// Number of most recent contests retained.
    pub contest_log_capacity: usize,
    /// Number of most recent generation summaries retained.
    pub history_capacity: usize,
}

impl EngineConfig {
    /// Returns a minimal elitist configuration: one
    /// individual, a single elite, unit tournaments, and
    /// no logs.
    ///
    /// # Note
    /// This value is not suitable for use in most simulations.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evolab::{Breeding, EngineConfig};
    ///
    /// let config = EngineConfig {
    ///     population_size: 20,
    ///     breeding: Breeding::Elitist { elitism: 1, tournament_size: 3 },
    ///     ..EngineConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> EngineConfig {
        EngineConfig {
            population_size: 1,
            breeding: Breeding::Elitist {
                elitism: 1,
                tournament_size: 1,
            },
            lineages: 0,
            contest_log_capacity: 0,
            history_capacity: 0,
        }
    }

    /// Checks the configuration for values no tick could
    /// honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        match self.breeding {
            Breeding::Elitist {
                elitism,
                tournament_size,
            } => {
                if tournament_size == 0 {
                    return Err(ConfigError::EmptyTournament);
                }
                if elitism == 0 {
                    return Err(ConfigError::NoElitism);
                }
                if elitism > self.population_size {
                    return Err(ConfigError::ElitismTooLarge {
                        elitism,
                        population_size: self.population_size,
                    });
                }
            }
            Breeding::Competitive { survivors, luck } => {
                if survivors == 0 || survivors >= self.population_size {
                    return Err(ConfigError::InvalidSurvivorCount {
                        survivors,
                        population_size: self.population_size,
                    });
                }
                if !luck.is_finite() || luck < 0.0 {
                    return Err(ConfigError::InvalidLuck(luck));
                }
            }
        }
        Ok(())
    }

    pub fn is_competitive(&self) -> bool {
        matches!(self.breeding, Breeding::Competitive { .. })
    }
}
