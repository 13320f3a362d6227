//! Pairwise stochastic elimination for competitive simulations.
use crate::rng;
use crate::{FitnessFunction, Individual, IndividualId};

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::fmt;

/// Outcome of a single contest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub winner: IndividualId,
    pub loser: IndividualId,
    /// Winner's fitness before luck was added.
    pub winner_fitness: f32,
    /// Loser's fitness before luck was added.
    pub loser_fitness: f32,
}

impl fmt::Display for Contest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} defeated {} ({:.1} vs {:.1})",
            self.winner, self.loser, self.winner_fitness, self.loser_fitness
        )
    }
}

/// Bounded log keeping only the most recent contests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContestLog {
    capacity: usize,
    contests: VecDeque<Contest>,
}

impl ContestLog {
    pub fn new(capacity: usize) -> ContestLog {
        ContestLog {
            capacity,
            contests: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a contest, evicting the oldest if full.
    pub fn record(&mut self, contest: Contest) {
        if self.capacity == 0 {
            return;
        }
        while self.contests.len() >= self.capacity {
            self.contests.pop_front();
        }
        self.contests.push_back(contest);
    }

    /// Changes the capacity, keeping the newest contests.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.contests.len() > capacity {
            self.contests.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.contests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contests.is_empty()
    }

    pub fn clear(&mut self) {
        self.contests.clear();
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Contest> {
        self.contests.iter()
    }
}

/// Reduces a population to a target number of survivors
/// through random pairwise contests.
///
/// Each contest pairs two distinct living individuals chosen
/// uniformly; each scores its fitness plus an independent
/// luck term in `[0, luck)`, and the lower score is marked dead.
/// Ties go to the second contestant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContestElimination {
    pub survivors: usize,
    pub luck: f32,
}

impl ContestElimination {
    pub fn new(survivors: usize, luck: f32) -> ContestElimination {
        ContestElimination { survivors, luck }
    }

    /// Runs contests until at most `survivors` remain alive,
    /// recording each in `log`, and returns how many were held.
    pub fn eliminate<F, R>(
        &self,
        population: &mut [Individual],
        fitness: &F,
        context: &F::Context,
        log: &mut ContestLog,
        rng: &mut R,
    ) -> usize
    where
        F: FitnessFunction,
        R: Rng + ?Sized,
    {
        let mut living: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, individual)| individual.is_alive())
            .map(|(i, _)| i)
            .collect();
        let mut contests = 0;

        while living.len() > self.survivors && living.len() >= 2 {
            let first = rng.gen_range(0..living.len());
            let mut second = rng.gen_range(0..living.len() - 1);
            if second >= first {
                second += 1;
            }

            let (a, b) = (living[first], living[second]);
            let fitness_a = fitness.evaluate_individual(&population[a], context);
            let fitness_b = fitness.evaluate_individual(&population[b], context);
            let score_a = fitness_a + rng::scaled(rng, self.luck);
            let score_b = fitness_b + rng::scaled(rng, self.luck);

            let (winner, loser, loser_slot, contest) = if score_a > score_b {
                (a, b, second, (fitness_a, fitness_b))
            } else {
                (b, a, first, (fitness_b, fitness_a))
            };

            population[loser].kill();
            population[winner].record_kill();
            living.swap_remove(loser_slot);
            contests += 1;

            let contest = Contest {
                winner: population[winner].id(),
                loser: population[loser].id(),
                winner_fitness: contest.0,
                loser_fitness: contest.1,
            };
            trace!("contest: {}", contest);
            log.record(contest);
        }

        contests
    }
}
