/// Configuration rejected before it could reach a tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population size must be non-zero")]
    EmptyPopulation,
    #[error("tournament size must be non-zero")]
    EmptyTournament,
    #[error("elitist breeding must carry over at least one individual")]
    NoElitism,
    #[error("elitism of {elitism} exceeds population size {population_size}")]
    ElitismTooLarge {
        elitism: usize,
        population_size: usize,
    },
    #[error("survivor count {survivors} must be in [1, {population_size})")]
    InvalidSurvivorCount {
        survivors: usize,
        population_size: usize,
    },
    #[error("contest luck must be finite and non-negative, got {0}")]
    InvalidLuck(f32),
    #[error("mutation rate must lie in [0, 1], got {0}")]
    InvalidMutationRate(f32),
    #[error("mutation magnitude must be finite and non-negative, got {0}")]
    InvalidMutationMagnitude(f32),
    #[error("trait schema must contain at least one trait")]
    EmptySchema,
    #[error("trait `{name}` has invalid bound [{min}, {max}]")]
    InvalidTraitBound {
        name: String,
        min: f32,
        max: f32,
    },
    #[error("trait `{0}` is declared more than once")]
    DuplicateTrait(String),
    #[error("fitness function reads {expected} traits but the schema declares {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
    },
    #[error("{seeds} seed individuals exceed population size {population_size}")]
    TooManySeeds {
        seeds: usize,
        population_size: usize,
    },
    #[error("seed individual {index} does not conform to the trait schema")]
    NonconformingSeed { index: usize },
    #[error("invalid evaluation context: {0}")]
    InvalidContext(String),
}

/// A tick refused because the population is degenerate.
/// Neither is recovered from automatically: the engine must
/// be re-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error("attempted evolution on an empty population")]
    EmptyPopulation,
    #[error("no living individuals remain")]
    Extinct,
}
