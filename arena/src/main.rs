//! Runs an evolab simulation from a RON file, ticking on a
//! fixed interval and logging every generation.
mod run_config;

use evolab::{
    ConfigError, EvolutionEngine, FitnessFunction, Individual, Snapshot, TickError, TraitSchema,
    VariationPolicy,
};
use evolab_sims::color::{self, Rgb};
use evolab_sims::tributes::{self, Environment, Environments};
use run_config::{RunConfig, Simulation};

use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use std::fs;
use std::thread;
use std::time::Duration;

/// Number of leaders logged per generation.
const LEADERS: usize = 3;

#[derive(Debug, thiserror::Error)]
enum ArenaError {
    #[error("usage: arena <run.ron>")]
    Usage,
    #[error("could not read run file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse run file: {0}")]
    Parse(#[from] ron::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation halted: {0}")]
    Tick(#[from] TickError),
    #[error("unknown environment {0:?}")]
    UnknownEnvironment(String),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ArenaError> {
    let path = std::env::args().nth(1).ok_or(ArenaError::Usage)?;
    let config: RunConfig = ron::from_str(&fs::read_to_string(&path)?)?;
    let rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let interval = Duration::from_millis(config.interval_ms);

    match &config.simulation {
        Simulation::Color { target } => {
            let mut rng = rng;
            let target = target.unwrap_or_else(|| Rgb::random(&mut rng));
            let mut engine = color::engine(target, rng)?;
            apply_mutation(&mut engine, &config)?;
            run_ticks(&mut engine, config.generations, interval, |_, snapshot| {
                log_leaders(snapshot, |i| format!("{} {}", i.id(), Rgb::of(i)));
                Ok(())
            })
        }
        Simulation::Tributes {
            environment,
            switches,
        } => {
            let environments = Environments::standard();
            let lookup = |key: &str| -> Result<Environment, ArenaError> {
                environments
                    .get(key)
                    .cloned()
                    .ok_or_else(|| ArenaError::UnknownEnvironment(key.to_owned()))
            };
            let initial = lookup(environment.as_str())?;
            let mut engine = tributes::engine(initial, rng)?;
            apply_mutation(&mut engine, &config)?;
            run_ticks(&mut engine, config.generations, interval, |engine, snapshot| {
                log_leaders(snapshot, |t| {
                    format!(
                        "{} of {}",
                        tributes::tribute_name(t.id()),
                        tributes::district(t).unwrap_or("no district")
                    )
                });
                for contest in &snapshot.contests {
                    info!("  {}", tributes::describe_contest(contest));
                }
                for (_, key) in switches.iter().filter(|(g, _)| *g == snapshot.generation) {
                    let next = lookup(key.as_str())?;
                    info!("arena environment changes to {}", next);
                    engine.set_context(next)?;
                }
                Ok(())
            })
        }
    }
}

fn apply_mutation<F, V, R>(
    engine: &mut EvolutionEngine<F, V, R>,
    config: &RunConfig,
) -> Result<(), ConfigError>
where
    F: FitnessFunction,
    V: VariationPolicy,
    R: Rng,
{
    match config.mutation {
        Some(mutation) => engine.set_mutation(mutation),
        None => Ok(()),
    }
}

/// Ticks `generations` times, pausing `interval` between
/// ticks. `observe` sees every snapshot and may reconfigure
/// the engine before the next tick.
fn run_ticks<F, V, R>(
    engine: &mut EvolutionEngine<F, V, R>,
    generations: usize,
    interval: Duration,
    mut observe: impl FnMut(&mut EvolutionEngine<F, V, R>, &Snapshot) -> Result<(), ArenaError>,
) -> Result<(), ArenaError>
where
    F: FitnessFunction,
    V: VariationPolicy,
    R: Rng,
{
    for _ in 0..generations {
        let snapshot = engine.tick()?;
        if let Some(summary) = engine.history().latest() {
            info!("{}", summary);
        }
        log_champion_traits(&snapshot, engine.schema());
        observe(engine, &snapshot)?;
        thread::sleep(interval);
    }
    info!(
        "finished after {} generations; best fitness {:.4}, {} deaths",
        engine.generation(),
        engine.best_fitness(),
        engine.deaths()
    );
    Ok(())
}

fn log_leaders(snapshot: &Snapshot, label: impl Fn(&Individual) -> String) {
    let leaders = snapshot.leaderboard().into_iter().take(LEADERS);
    for (rank, leader) in leaders.enumerate() {
        info!("  #{} {} ({:.4})", rank + 1, label(leader), leader.fitness());
    }
}

fn log_champion_traits(snapshot: &Snapshot, schema: &TraitSchema) {
    if let Some(champion) = snapshot.champion() {
        let profile: Vec<String> = schema
            .bounds()
            .iter()
            .filter_map(|bound| {
                champion
                    .trait_value(schema, &bound.name)
                    .map(|value| format!("{} {:.1}", bound.name, value))
            })
            .collect();
        info!("  champion traits: {}", profile.join(", "));
    }
}
