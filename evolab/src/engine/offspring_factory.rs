use crate::{
    FitnessFunction, Individual, IndividualId, SelectionPolicy, TraitSchema, VariationPolicy,
};

use rand::Rng;

/// Auxiliary type for offspring generation.
/// Borrows exactly the parts of the engine needed to
/// select parents, vary their traits, and evaluate the
/// resulting children.
pub(super) struct OffspringFactory<'a, F: FitnessFunction, V, R> {
    schema: &'a TraitSchema,
    fitness: &'a F,
    context: &'a F::Context,
    variation: &'a V,
    rng: &'a mut R,
    next_id: &'a mut u64,
}

impl<'a, F, V, R> OffspringFactory<'a, F, V, R>
where
    F: FitnessFunction,
    V: VariationPolicy,
    R: Rng,
{
    pub(super) fn new(
        schema: &'a TraitSchema,
        fitness: &'a F,
        context: &'a F::Context,
        variation: &'a V,
        rng: &'a mut R,
        next_id: &'a mut u64,
    ) -> OffspringFactory<'a, F, V, R> {
        OffspringFactory {
            schema,
            fitness,
            context,
            variation,
            rng,
            next_id,
        }
    }

    /// Breeds `count` evaluated children from `parents`.
    ///
    /// # Panics
    /// Panics if `count > 0` and `parents` is empty.
    pub(super) fn generate_offspring<S: SelectionPolicy>(
        &mut self,
        parents: &[Individual],
        selection: &S,
        count: usize,
    ) -> Vec<Individual> {
        let mut offspring = Vec::with_capacity(count);
        for _ in 0..count {
            offspring.push(self.mate(parents, selection));
        }
        offspring
    }

    /// Selects two parents and produces a single child.
    fn mate<S: SelectionPolicy>(&mut self, parents: &[Individual], selection: &S) -> Individual {
        let parent1 = selection.select(parents, &mut *self.rng);
        let parent2 = selection.select(parents, &mut *self.rng);
        let traits = self
            .variation
            .vary(parent1.traits(), parent2.traits(), self.schema, &mut *self.rng);

        let mut child = Individual::new(self.fresh_id(), traits);
        if let Some(lineage) = self.inherit_lineage(parent1, parent2) {
            child = child.with_lineage(lineage);
        }
        child.set_fitness(self.fitness.evaluate_individual(&child, self.context));
        child
    }

    /// Children take the lineage of either parent with equal
    /// probability.
    fn inherit_lineage(&mut self, parent1: &Individual, parent2: &Individual) -> Option<usize> {
        match (parent1.lineage(), parent2.lineage()) {
            (Some(first), Some(second)) => {
                Some(if self.rng.gen::<bool>() { first } else { second })
            }
            (first, second) => first.or(second),
        }
    }

    fn fresh_id(&mut self) -> IndividualId {
        let id = IndividualId(*self.next_id);
        *self.next_id += 1;
        id
    }
}
