//! The evolution engine owns a population and advances
//! it one generation per [`tick`](EvolutionEngine::tick).
mod config;
mod errors;
mod history;
mod offspring_factory;
mod snapshot;

pub use config::{Breeding, EngineConfig};
pub use errors::{ConfigError, TickError};
pub use history::{GenerationSummary, History, Stats};
pub use snapshot::Snapshot;

use crate::{
    ContestElimination, ContestLog, FitnessFunction, Individual, IndividualId, Mutation,
    Tournament, TraitSchema, UniformRandom, VariationPolicy,
};
use offspring_factory::OffspringFactory;

use log::{debug, info, warn};
use rand::Rng;

/// A generation-based evolutionary simulation.
///
/// Every random draw comes from the engine's own `rng`,
/// so a seeded generator makes runs reproducible. Ticks
/// are plain synchronous computations; configuration and
/// context changes made between ticks apply from the next
/// tick on and never rewrite earlier generations.
pub struct EvolutionEngine<F: FitnessFunction, V, R> {
    config: EngineConfig,
    schema: TraitSchema,
    fitness: F,
    context: F::Context,
    variation: V,
    rng: R,
    population: Vec<Individual>,
    generation: usize,
    next_id: u64,
    best_fitness: f32,
    deaths: usize,
    contests: ContestLog,
    history: History,
}

impl<F, V, R> EvolutionEngine<F, V, R>
where
    F: FitnessFunction,
    V: VariationPolicy,
    R: Rng,
{
    /// Creates an engine and seeds it with a random population.
    ///
    /// # Errors
    /// Returns an error if the configuration, the mutation
    /// parameters, or the context are invalid, or if the
    /// fitness function expects a different number of traits
    /// than `schema` declares.
    pub fn new(
        config: EngineConfig,
        schema: TraitSchema,
        fitness: F,
        context: F::Context,
        variation: V,
        rng: R,
    ) -> Result<EvolutionEngine<F, V, R>, ConfigError> {
        config.validate()?;
        variation.mutation().validate()?;
        if let Some(expected) = fitness.arity() {
            if expected != schema.len() {
                return Err(ConfigError::ArityMismatch {
                    expected,
                    found: schema.len(),
                });
            }
        }
        fitness.validate_context(&context)?;

        let mut engine = EvolutionEngine {
            contests: ContestLog::new(config.contest_log_capacity),
            history: History::new(config.history_capacity),
            config,
            schema,
            fitness,
            context,
            variation,
            rng,
            population: Vec::new(),
            generation: 0,
            next_id: 1,
            best_fitness: 0.0,
            deaths: 0,
        };
        engine.populate(Vec::new());
        Ok(engine)
    }

    /// Replaces the population with a random one and resets
    /// the generation counter, death count, contest log and
    /// history.
    pub fn initialize(&mut self) -> Snapshot {
        self.populate(Vec::new());
        self.snapshot()
    }

    /// Like [`initialize`](Self::initialize), but the first
    /// individuals take the given trait values. The rest of
    /// the population is filled randomly.
    ///
    /// # Errors
    /// Returns an error, leaving the engine untouched, if
    /// there are more seeds than the population size or any
    /// seed does not conform to the trait schema.
    pub fn initialize_seeded(&mut self, seeds: Vec<Vec<f32>>) -> Result<Snapshot, ConfigError> {
        if seeds.len() > self.config.population_size {
            return Err(ConfigError::TooManySeeds {
                seeds: seeds.len(),
                population_size: self.config.population_size,
            });
        }
        if let Some(index) = seeds.iter().position(|s| !self.schema.conforms(s)) {
            return Err(ConfigError::NonconformingSeed { index });
        }
        self.populate(seeds);
        Ok(self.snapshot())
    }

    /// Alias of [`initialize`](Self::initialize), reusing the
    /// current configuration and context.
    pub fn reset(&mut self) -> Snapshot {
        self.initialize()
    }

    fn populate(&mut self, seeds: Vec<Vec<f32>>) {
        self.next_id = 1;
        let mut population = Vec::with_capacity(self.config.population_size);
        for traits in seeds {
            let id = self.fresh_id();
            population.push(Individual::new(id, traits));
        }
        while population.len() < self.config.population_size {
            let id = self.fresh_id();
            population.push(Individual::random(id, &self.schema, &mut self.rng));
        }
        if self.config.lineages > 0 {
            let lineages = self.config.lineages;
            population = population
                .into_iter()
                .map(|individual| {
                    let lineage = self.rng.gen_range(0..lineages);
                    individual.with_lineage(lineage)
                })
                .collect();
        }

        self.population = population;
        self.generation = 0;
        self.deaths = 0;
        self.contests.clear();
        self.history.clear();
        self.evaluate_population();
        self.record_generation(0);
        info!(
            "initialized {} population of {} individuals",
            if self.config.is_competitive() {
                "competitive"
            } else {
                "elitist"
            },
            self.population.len()
        );
    }

    /// Advances the simulation by one generation and returns
    /// the resulting state.
    ///
    /// # Errors
    /// Returns an error, without advancing the generation,
    /// if the population is degenerate: empty, or (in a
    /// competitive simulation) without living individuals.
    /// Recovery requires [`initialize`](Self::initialize).
    pub fn tick(&mut self) -> Result<Snapshot, TickError> {
        let contests = match self.config.breeding {
            Breeding::Elitist {
                elitism,
                tournament_size,
            } => {
                self.breed_elitist(elitism, tournament_size)?;
                0
            }
            Breeding::Competitive { survivors, luck } => self.breed_competitive(survivors, luck)?,
        };
        self.generation += 1;
        self.record_generation(contests);
        Ok(self.snapshot())
    }

    /// Carries the elite over unchanged and fills the rest of
    /// the generation with tournament-selected offspring.
    fn breed_elitist(&mut self, elitism: usize, tournament_size: usize) -> Result<(), TickError> {
        if self.population.is_empty() {
            warn!(
                "refusing to tick generation {}: empty population",
                self.generation
            );
            return Err(TickError::EmptyPopulation);
        }
        self.evaluate_population();
        self.population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        let size = self.config.population_size;
        let mut next: Vec<Individual> = self
            .population
            .iter()
            .take(elitism.min(size))
            .cloned()
            .collect();
        let tournament = Tournament::new(tournament_size);
        let count = size - next.len();
        let offspring = OffspringFactory::new(
            &self.schema,
            &self.fitness,
            &self.context,
            &self.variation,
            &mut self.rng,
            &mut self.next_id,
        )
        .generate_offspring(&self.population, &tournament, count);
        next.extend(offspring);

        self.population = next;
        Ok(())
    }

    /// Runs the contest phase, ages the survivors, and breeds
    /// the population back to full size from uniformly chosen
    /// survivors. Returns the number of contests held.
    fn breed_competitive(&mut self, survivors: usize, luck: f32) -> Result<usize, TickError> {
        if !self.population.iter().any(Individual::is_alive) {
            warn!(
                "refusing to tick generation {}: no living individuals",
                self.generation
            );
            return Err(TickError::Extinct);
        }

        let contests = ContestElimination::new(survivors, luck).eliminate(
            &mut self.population,
            &self.fitness,
            &self.context,
            &mut self.contests,
            &mut self.rng,
        );
        self.deaths += contests;

        let mut next: Vec<Individual> = self
            .population
            .drain(..)
            .filter(Individual::is_alive)
            .collect();
        for survivor in &mut next {
            survivor.grow_older();
            let fitness = self.fitness.evaluate_individual(survivor, &self.context);
            survivor.set_fitness(fitness);
        }

        let count = self.config.population_size.saturating_sub(next.len());
        let offspring = OffspringFactory::new(
            &self.schema,
            &self.fitness,
            &self.context,
            &self.variation,
            &mut self.rng,
            &mut self.next_id,
        )
        .generate_offspring(&next, &UniformRandom, count);
        next.extend(offspring);

        self.population = next;
        Ok(contests)
    }

    /// Re-evaluates every individual under the current context.
    fn evaluate_population(&mut self) {
        for individual in &mut self.population {
            let fitness = self.fitness.evaluate_individual(individual, &self.context);
            individual.set_fitness(fitness);
        }
    }

    fn record_generation(&mut self, contests: usize) {
        let fitness = Stats::from(
            self.population
                .iter()
                .filter(|i| i.is_alive())
                .map(Individual::fitness),
        );
        self.best_fitness = fitness.maximum;
        let summary = GenerationSummary {
            generation: self.generation,
            fitness,
            living: self.living_count(),
            contests,
        };
        debug!("{}", summary);
        self.history.record(summary);
    }

    fn fresh_id(&mut self) -> IndividualId {
        let id = IndividualId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Returns the current state, with fitness evaluated
    /// under the current context.
    pub fn snapshot(&self) -> Snapshot {
        let population: Vec<Individual> = self
            .population
            .iter()
            .cloned()
            .map(|mut individual| {
                let fitness = self.fitness.evaluate_individual(&individual, &self.context);
                individual.set_fitness(fitness);
                individual
            })
            .collect();
        let fitness = Stats::from(
            population
                .iter()
                .filter(|i| i.is_alive())
                .map(Individual::fitness),
        );
        Snapshot {
            generation: self.generation,
            population,
            best_fitness: fitness.maximum,
            fitness,
            deaths: self.deaths,
            contests: self.contests.iter().cloned().collect(),
        }
    }

    /// Replaces the evaluation context. Stored fitness values
    /// are left alone; the new context applies from the next
    /// evaluation on.
    ///
    /// # Errors
    /// Returns an error, keeping the old context, if the
    /// fitness function rejects `context`.
    pub fn set_context(&mut self, context: F::Context) -> Result<(), ConfigError> {
        self.fitness.validate_context(&context)?;
        info!("evaluation context changed to {:?}", context);
        self.context = context;
        Ok(())
    }

    /// Replaces the engine configuration. A new population
    /// size takes effect at the next tick or initialization.
    ///
    /// # Errors
    /// Returns an error, keeping the old configuration, if
    /// `config` is invalid.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.contests.set_capacity(config.contest_log_capacity);
        self.history.set_capacity(config.history_capacity);
        info!("engine configuration changed to {:?}", config);
        self.config = config;
        Ok(())
    }

    /// Replaces the mutation parameters.
    ///
    /// # Errors
    /// Returns an error, keeping the old parameters, if
    /// `mutation` is invalid.
    pub fn set_mutation(&mut self, mutation: Mutation) -> Result<(), ConfigError> {
        mutation.validate()?;
        self.variation.set_mutation(mutation);
        Ok(())
    }

    /// Returns the current population, with fitness as of
    /// the last evaluation.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Returns the number of living individuals.
    pub fn living_count(&self) -> usize {
        self.population.iter().filter(|i| i.is_alive()).count()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the best fitness as of the last tick or
    /// initialization.
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Returns the total number of contests lost since
    /// initialization.
    pub fn deaths(&self) -> usize {
        self.deaths
    }

    /// Returns the rolling log of recent contests.
    pub fn contests(&self) -> &ContestLog {
        &self.contests
    }

    /// Returns the rolling log of recent generations.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn context(&self) -> &F::Context {
        &self.context
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schema(&self) -> &TraitSchema {
        &self.schema
    }

    pub fn fitness_function(&self) -> &F {
        &self.fitness
    }

    pub fn variation(&self) -> &V {
        &self.variation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AveragingCrossover;
    use crate::BlendCrossover;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Fitness equal to the sum of traits times a factor.
    #[derive(Debug)]
    struct Scaled;

    impl FitnessFunction for Scaled {
        type Context = f32;

        fn evaluate(&self, traits: &[f32], factor: &f32) -> f32 {
            traits.iter().sum::<f32>() * factor
        }

        fn arity(&self) -> Option<usize> {
            Some(2)
        }

        fn validate_context(&self, factor: &f32) -> Result<(), ConfigError> {
            if factor.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidContext(format!("factor {}", factor)))
            }
        }
    }

    fn schema() -> TraitSchema {
        TraitSchema::uniform(&["a", "b"], 0.0, 10.0).unwrap()
    }

    fn elitist(seed: u64) -> EvolutionEngine<Scaled, BlendCrossover, ChaCha8Rng> {
        let config = EngineConfig {
            population_size: 8,
            breeding: Breeding::Elitist {
                elitism: 1,
                tournament_size: 3,
            },
            history_capacity: 4,
            ..EngineConfig::zero()
        };
        EvolutionEngine::new(
            config,
            schema(),
            Scaled,
            1.0,
            BlendCrossover::new(Mutation { rate: 0.3, magnitude: 2.0 }),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn competitive(seed: u64) -> EvolutionEngine<Scaled, AveragingCrossover, ChaCha8Rng> {
        let config = EngineConfig {
            population_size: 10,
            breeding: Breeding::Competitive {
                survivors: 4,
                luck: 5.0,
            },
            lineages: 3,
            contest_log_capacity: 5,
            ..EngineConfig::zero()
        };
        EvolutionEngine::new(
            config,
            schema(),
            Scaled,
            1.0,
            AveragingCrossover::new(Mutation { rate: 0.15, magnitude: 2.0 }),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn construction_validates_eagerly() {
        let bad_config = EngineConfig {
            population_size: 0,
            ..EngineConfig::zero()
        };
        let result = EvolutionEngine::new(
            bad_config,
            schema(),
            Scaled,
            1.0,
            BlendCrossover::new(Mutation::zero()),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(result.err(), Some(ConfigError::EmptyPopulation));

        let no_elite = EngineConfig {
            population_size: 6,
            breeding: Breeding::Elitist {
                elitism: 0,
                tournament_size: 3,
            },
            ..EngineConfig::zero()
        };
        let result = EvolutionEngine::new(
            no_elite,
            schema(),
            Scaled,
            1.0,
            BlendCrossover::new(Mutation::zero()),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(result.err(), Some(ConfigError::NoElitism));

        let result = EvolutionEngine::new(
            EngineConfig::zero(),
            TraitSchema::uniform(&["a", "b", "c"], 0.0, 1.0).unwrap(),
            Scaled,
            1.0,
            BlendCrossover::new(Mutation::zero()),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(
            result.err(),
            Some(ConfigError::ArityMismatch { expected: 2, found: 3 })
        );

        let result = EvolutionEngine::new(
            EngineConfig::zero(),
            schema(),
            Scaled,
            f32::NAN,
            BlendCrossover::new(Mutation::zero()),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(result.err(), Some(ConfigError::InvalidContext(_))));

        let result = EvolutionEngine::new(
            EngineConfig::zero(),
            schema(),
            Scaled,
            1.0,
            BlendCrossover::new(Mutation { rate: 2.0, magnitude: 1.0 }),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(result.err(), Some(ConfigError::InvalidMutationRate(2.0)));
    }

    #[test]
    fn initial_state() {
        let engine = elitist(1);
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.population().len(), 8);
        assert_eq!(engine.deaths(), 0);
        assert!(engine.contests().is_empty());
        assert_eq!(engine.history().len(), 1);
        let ids: Vec<u64> = engine.population().iter().map(|i| i.id().0).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        assert!(engine
            .population()
            .iter()
            .all(|i| (i.fitness() - i.traits().iter().sum::<f32>()).abs() < 1e-6));
    }

    #[test]
    fn elitist_tick_keeps_size_and_best() {
        let mut engine = elitist(2);
        for _ in 0..30 {
            let before = engine.snapshot();
            let champion = before.leaderboard()[0].clone();
            let after = engine.tick().unwrap();

            assert_eq!(after.population.len(), 8);
            assert_eq!(after.generation, before.generation + 1);
            assert!(after
                .population
                .iter()
                .any(|i| i.id() == champion.id() && i.traits() == champion.traits()));
            assert!(after.best_fitness >= before.best_fitness);
            assert!(after.population.iter().all(|i| schema().conforms(i.traits())));
        }
        assert_eq!(engine.history().len(), 4);
        assert_eq!(engine.history().latest().map(|s| s.generation), Some(30));
    }

    #[test]
    fn ids_are_fresh_and_increasing() {
        let mut engine = elitist(3);
        let before_max = engine.population().iter().map(|i| i.id()).max().unwrap();
        engine.tick().unwrap();
        let newcomers: Vec<IndividualId> = engine
            .population()
            .iter()
            .map(|i| i.id())
            .filter(|id| *id > before_max)
            .collect();
        assert_eq!(newcomers.len(), 7);
        assert_eq!(
            newcomers,
            (9..=15).map(IndividualId).collect::<Vec<_>>()
        );
    }

    #[test]
    fn competitive_tick_eliminates_ages_and_refills() {
        let mut engine = competitive(4);
        let snapshot = engine.tick().unwrap();

        assert_eq!(snapshot.population.len(), 10);
        assert_eq!(snapshot.living_count(), 10);
        assert_eq!(snapshot.deaths, 6);
        assert_eq!(snapshot.contests.len(), 5);
        let survivors = snapshot.population.iter().filter(|i| i.age() == 1);
        assert_eq!(survivors.count(), 4);
        let kills: u32 = snapshot.population.iter().map(|i| i.kills()).sum();
        assert!(kills <= 6);
        assert!(snapshot
            .population
            .iter()
            .all(|i| i.lineage().map_or(false, |l| l < 3)));

        engine.tick().unwrap();
        assert_eq!(engine.deaths(), 12);
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn extinct_population_is_reported() {
        let mut engine = competitive(5);
        for individual in &mut engine.population {
            individual.kill();
        }
        assert_eq!(engine.tick().err(), Some(TickError::Extinct));
        assert_eq!(engine.generation(), 0);

        engine.initialize();
        assert!(engine.tick().is_ok());
    }

    #[test]
    fn empty_population_is_reported() {
        let mut engine = elitist(6);
        engine.population.clear();
        assert_eq!(engine.tick().err(), Some(TickError::EmptyPopulation));
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn context_changes_apply_to_later_evaluations() {
        let mut engine = elitist(7);
        let stored: Vec<f32> = engine.population().iter().map(|i| i.fitness()).collect();

        assert!(engine.set_context(f32::INFINITY).is_err());
        assert_eq!(*engine.context(), 1.0);

        engine.set_context(-1.0).unwrap();
        let unchanged: Vec<f32> = engine.population().iter().map(|i| i.fitness()).collect();
        assert_eq!(stored, unchanged);

        let snapshot = engine.snapshot();
        assert!(snapshot
            .population
            .iter()
            .all(|i| (i.fitness() + i.traits().iter().sum::<f32>()).abs() < 1e-6));
    }

    #[test]
    fn seeded_initialization() {
        let mut engine = elitist(8);
        assert!(matches!(
            engine.initialize_seeded(vec![vec![1.0, 1.0]; 9]),
            Err(ConfigError::TooManySeeds { .. })
        ));
        assert_eq!(
            engine.initialize_seeded(vec![vec![1.0, 1.0], vec![1.0, 11.0]]).err(),
            Some(ConfigError::NonconformingSeed { index: 1 })
        );

        engine.tick().unwrap();
        let snapshot = engine.initialize_seeded(vec![vec![10.0, 10.0]]).unwrap();
        assert_eq!(snapshot.generation, 0);
        assert_eq!(snapshot.population.len(), 8);
        assert_eq!(snapshot.population[0].traits(), &[10.0, 10.0]);
        assert_eq!(snapshot.best_fitness, 20.0);
    }

    #[test]
    fn reconfiguration_between_ticks() {
        let mut engine = elitist(9);
        let invalid = EngineConfig {
            population_size: 4,
            breeding: Breeding::Elitist {
                elitism: 5,
                tournament_size: 3,
            },
            ..EngineConfig::zero()
        };
        assert!(engine.set_config(invalid).is_err());
        assert_eq!(engine.config().population_size, 8);

        let grown = EngineConfig {
            population_size: 12,
            ..engine.config().clone()
        };
        engine.set_config(grown).unwrap();
        assert_eq!(engine.population().len(), 8);
        assert_eq!(engine.tick().unwrap().population.len(), 12);

        assert!(engine.set_mutation(Mutation { rate: 0.5, magnitude: -3.0 }).is_err());
        engine.set_mutation(Mutation { rate: 0.5, magnitude: 3.0 }).unwrap();
        assert_eq!(engine.variation().mutation().rate, 0.5);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut a = competitive(10);
        let mut b = competitive(10);
        for _ in 0..5 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
        }
    }
}
