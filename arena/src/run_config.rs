use evolab::Mutation;
use evolab_sims::color::Rgb;

use serde::Deserialize;

/// Which simulation to run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum Simulation {
    /// Color matching. A random target is drawn if none is given.
    Color {
        #[serde(default)]
        target: Option<Rgb>,
    },
    /// Tribute arena in the named environment. `switches`
    /// lists `(generation, environment)` pairs; the new
    /// environment applies from that generation's tick on.
    Tributes {
        environment: String,
        #[serde(default)]
        switches: Vec<(usize, String)>,
    },
}

/// A run read from a RON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RunConfig {
    pub simulation: Simulation,
    /// Generator seed. Runs without one are not reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pause between ticks.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    pub generations: usize,
    /// Overrides the simulation's standard mutation parameters.
    #[serde(default)]
    pub mutation: Option<Mutation>,
}

fn default_interval() -> u64 {
    500
}
