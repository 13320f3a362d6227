use crate::engine::ConfigError;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Identifier of an individual. Fresh identifiers are
/// handed out in increasing order by the engine, both at
/// initialization and at birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndividualId(pub u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named trait and the closed interval its values live in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitBound {
    pub name: String,
    pub min: f32,
    pub max: f32,
}

impl TraitBound {
    /// Returns a new bound. Validity is only checked when
    /// the bound is placed in a [`TraitSchema`].
    pub fn new(name: impl Into<String>, min: f32, max: f32) -> TraitBound {
        TraitBound {
            name: name.into(),
            min,
            max,
        }
    }

    /// Clamps `value` into the bound.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Returns whether `value` lies within the bound.
    /// `NaN` is never contained.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The fixed, ordered set of traits every individual
/// of a simulation carries.
///
/// # Examples
/// ```
/// use evolab::{TraitBound, TraitSchema};
///
/// let schema = TraitSchema::uniform(&["r", "g", "b"], 0.0, 255.0).unwrap();
/// assert_eq!(schema.len(), 3);
/// assert_eq!(schema.index_of("g"), Some(1));
///
/// // Inverted bounds are rejected.
/// assert!(TraitSchema::new(vec![TraitBound::new("x", 1.0, 0.0)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitSchema {
    bounds: Vec<TraitBound>,
}

impl TraitSchema {
    /// Creates a schema from the given bounds.
    ///
    /// # Errors
    /// Fails if there are no traits, if any bound is
    /// non-finite or has `min >= max`, or if two traits
    /// share a name.
    pub fn new(bounds: Vec<TraitBound>) -> Result<TraitSchema, ConfigError> {
        if bounds.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        for (i, bound) in bounds.iter().enumerate() {
            if !bound.min.is_finite() || !bound.max.is_finite() || bound.min >= bound.max {
                return Err(ConfigError::InvalidTraitBound {
                    name: bound.name.clone(),
                    min: bound.min,
                    max: bound.max,
                });
            }
            if bounds[..i].iter().any(|other| other.name == bound.name) {
                return Err(ConfigError::DuplicateTrait(bound.name.clone()));
            }
        }
        Ok(TraitSchema { bounds })
    }

    /// Creates a schema where every trait shares the same bound.
    pub fn uniform(names: &[&str], min: f32, max: f32) -> Result<TraitSchema, ConfigError> {
        Self::new(
            names
                .iter()
                .map(|name| TraitBound::new(*name, min, max))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Returns the trait bounds in storage order.
    pub fn bounds(&self) -> &[TraitBound] {
        &self.bounds
    }

    /// Returns the storage position of the named trait.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bounds.iter().position(|b| b.name == name)
    }

    /// Draws one independent uniform value per trait.
    pub fn random_traits<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f32> {
        self.bounds
            .iter()
            .map(|b| rng.gen_range(b.min..=b.max))
            .collect()
    }

    /// Clamps every value into its trait's bound.
    pub fn clamp(&self, traits: &mut [f32]) {
        for (value, bound) in traits.iter_mut().zip(&self.bounds) {
            *value = bound.clamp(*value);
        }
    }

    /// Returns whether `traits` has one in-bound value per trait.
    pub fn conforms(&self, traits: &[f32]) -> bool {
        traits.len() == self.bounds.len()
            && traits
                .iter()
                .zip(&self.bounds)
                .all(|(value, bound)| bound.contains(*value))
    }
}

/// A single candidate solution.
///
/// Traits are never changed after creation. The only
/// fields that change over an individual's life are its
/// cached fitness and, in competitive simulations, its
/// survival status and its `kills`/`age` counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    id: IndividualId,
    traits: Vec<f32>,
    fitness: f32,
    alive: bool,
    kills: u32,
    age: u32,
    lineage: Option<usize>,
}

impl Individual {
    /// Creates a living individual with zeroed counters
    /// and a fitness of 0 (to be evaluated by the caller).
    pub fn new(id: IndividualId, traits: Vec<f32>) -> Individual {
        Individual {
            id,
            traits,
            fitness: 0.0,
            alive: true,
            kills: 0,
            age: 0,
            lineage: None,
        }
    }

    /// Creates an individual with independent uniformly
    /// random trait values.
    pub fn random<R: Rng + ?Sized>(
        id: IndividualId,
        schema: &TraitSchema,
        rng: &mut R,
    ) -> Individual {
        Self::new(id, schema.random_traits(rng))
    }

    /// Tags the individual with a lineage (e.g. a district).
    pub fn with_lineage(mut self, lineage: usize) -> Individual {
        self.lineage = Some(lineage);
        self
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    /// Returns the trait values in schema order.
    pub fn traits(&self) -> &[f32] {
        &self.traits
    }

    /// Returns the value of the named trait.
    pub fn trait_value(&self, schema: &TraitSchema, name: &str) -> Option<f32> {
        schema
            .index_of(name)
            .and_then(|i| self.traits.get(i).copied())
    }

    /// Returns the most recently evaluated fitness.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn lineage(&self) -> Option<usize> {
        self.lineage
    }

    pub(crate) fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn record_kill(&mut self) {
        self.kills += 1;
    }

    pub(crate) fn grow_older(&mut self) {
        self.age += 1;
    }
}
