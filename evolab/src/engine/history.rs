use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields all zeros.
    ///
    /// # Examples
    /// ```
    /// use evolab::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats::default();
        }
        data.sort_unstable_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// Summary of one generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub fitness: Stats,
    pub living: usize,
    /// Contests held while producing this generation.
    pub contests: usize,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: best {:.4}, mean {:.4}, median {:.4}, living {}, contests {}",
            self.generation,
            self.fitness.maximum,
            self.fitness.mean,
            self.fitness.median,
            self.living,
            self.contests
        )
    }
}

/// Rolling record of the most recent generation summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    summaries: VecDeque<GenerationSummary>,
}

impl History {
    pub fn new(capacity: usize) -> History {
        History {
            capacity,
            summaries: VecDeque::with_capacity(capacity),
        }
    }

    /// Stores a summary, evicting the oldest if full.
    pub fn record(&mut self, summary: GenerationSummary) {
        if self.capacity == 0 {
            return;
        }
        while self.summaries.len() >= self.capacity {
            self.summaries.pop_front();
        }
        self.summaries.push_back(summary);
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.summaries.len() > capacity {
            self.summaries.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.summaries.clear();
    }

    /// Returns the newest summary.
    pub fn latest(&self) -> Option<&GenerationSummary> {
        self.summaries.back()
    }

    /// Iterate over stored summaries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationSummary> {
        self.summaries.iter()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
