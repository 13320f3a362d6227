use super::Stats;
use crate::{Contest, Individual};

use serde::{Deserialize, Serialize};

/// Immutable view of the engine's observable state,
/// produced after every tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: usize,
    /// Every individual, with fitness evaluated under the
    /// context that was current when the snapshot was taken.
    pub population: Vec<Individual>,
    /// Highest fitness among living individuals.
    pub best_fitness: f32,
    /// Fitness statistics over living individuals.
    pub fitness: Stats,
    /// Total contests lost since initialization.
    pub deaths: usize,
    /// Most recent contests, oldest first.
    pub contests: Vec<Contest>,
}

impl Snapshot {
    /// Iterates over living individuals.
    pub fn living(&self) -> impl Iterator<Item = &Individual> {
        self.population.iter().filter(|i| i.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// Returns the fittest living individual. Ties go to the
    /// earliest in population order.
    pub fn champion(&self) -> Option<&Individual> {
        self.living().reduce(|best, i| {
            if i.fitness() > best.fitness() {
                i
            } else {
                best
            }
        })
    }

    /// Returns living individuals ranked by decreasing fitness.
    pub fn leaderboard(&self) -> Vec<&Individual> {
        let mut ranked: Vec<&Individual> = self.living().collect();
        ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        ranked
    }

    /// Returns the per-trait mean over living individuals,
    /// or `None` if nobody is alive.
    pub fn trait_means(&self) -> Option<Vec<f32>> {
        let mut living = self.living().peekable();
        let arity = living.peek()?.traits().len();
        let mut sums = vec![0.0; arity];
        let mut count = 0;
        for individual in living {
            for (sum, value) in sums.iter_mut().zip(individual.traits()) {
                *sum += value;
            }
            count += 1;
        }
        Some(sums.into_iter().map(|sum| sum / count as f32).collect())
    }
}
