use evolab::{
    AveragingCrossover, BlendCrossover, Breeding, EngineConfig, EvolutionEngine, FitnessFunction,
    Mutation, TraitBound, TraitSchema, VariationPolicy,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Negative distance to the origin.
struct Origin;

impl FitnessFunction for Origin {
    type Context = ();

    fn evaluate(&self, traits: &[f32], _: &()) -> f32 {
        -traits.iter().map(|t| t * t).sum::<f32>().sqrt()
    }
}

fn schema() -> TraitSchema {
    TraitSchema::new(vec![
        TraitBound::new("narrow", -1.0, 1.0),
        TraitBound::new("byte", 0.0, 255.0),
        TraitBound::new("percent", 0.0, 100.0),
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn varied_children_stay_in_bounds(
        seed in any::<u64>(),
        rate in 0.0f32..=1.0,
        magnitude in 0.0f32..500.0,
    ) {
        let schema = schema();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mutation = Mutation { rate, magnitude };
        let blend = BlendCrossover::new(mutation);
        let average = AveragingCrossover::new(mutation);
        for _ in 0..50 {
            let parent1 = schema.random_traits(&mut rng);
            let parent2 = schema.random_traits(&mut rng);
            let child = blend.vary(&parent1, &parent2, &schema, &mut rng);
            prop_assert!(schema.conforms(&child), "{:?}", child);
            let child = average.vary(&parent1, &parent2, &schema, &mut rng);
            prop_assert!(schema.conforms(&child), "{:?}", child);
        }
    }

    #[test]
    fn elitist_ticks_preserve_size_and_elite(seed in any::<u64>(), size in 1usize..30) {
        let config = EngineConfig {
            population_size: size,
            breeding: Breeding::Elitist { elitism: 1, tournament_size: 3 },
            ..EngineConfig::zero()
        };
        let mut engine = EvolutionEngine::new(
            config,
            schema(),
            Origin,
            (),
            BlendCrossover::new(Mutation { rate: 0.5, magnitude: 50.0 }),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap();

        for _ in 0..10 {
            let before = engine.snapshot();
            let elite = before.leaderboard()[0].clone();
            let after = engine.tick().unwrap();
            prop_assert_eq!(after.population.len(), size);
            prop_assert!(after.population.iter().any(|i| i.traits() == elite.traits()));
            prop_assert!(after.best_fitness >= before.best_fitness);
            let schema = engine.schema();
            prop_assert!(after.population.iter().all(|i| schema.conforms(i.traits())));
        }
    }

    #[test]
    fn competitive_ticks_keep_survivor_arithmetic(
        seed in any::<u64>(),
        size in 2usize..40,
        survivor_share in 0.05f32..0.95,
    ) {
        let survivors = ((size as f32 * survivor_share) as usize).clamp(1, size - 1);
        let config = EngineConfig {
            population_size: size,
            breeding: Breeding::Competitive { survivors, luck: 30.0 },
            contest_log_capacity: 5,
            ..EngineConfig::zero()
        };
        let mut engine = EvolutionEngine::new(
            config,
            schema(),
            Origin,
            (),
            AveragingCrossover::new(Mutation { rate: 0.15, magnitude: 20.0 }),
            ChaCha8Rng::seed_from_u64(seed),
        )
        .unwrap();

        for generation in 1..=5 {
            let snapshot = engine.tick().unwrap();
            prop_assert_eq!(snapshot.population.len(), size);
            prop_assert_eq!(snapshot.living_count(), size);
            prop_assert_eq!(snapshot.deaths, generation * (size - survivors));
            let aged = snapshot.population.iter().filter(|i| i.age() > 0).count();
            prop_assert_eq!(aged, survivors);
            let held = generation * (size - survivors);
            prop_assert_eq!(snapshot.contests.len(), held.min(5));
        }
    }
}
