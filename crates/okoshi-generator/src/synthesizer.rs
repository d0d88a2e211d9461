//! Row synthesis from a column plan.

use crate::error::GenerateError;
use crate::generators::{generate_value, GenerationClock};
use crate::overrides::TableOverrides;
use crate::reference::ReferenceSampler;
use crate::unique::{RetryObserver, UniquenessTracker};
use okoshi_core::{ColumnPlan, Strategy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// One synthesized row: rendered literals in plan order.
pub type Row = Vec<String>;

/// Produces rows for a fixed column plan.
///
/// Owns every piece of run-wide generation state: the RNG, the uniqueness
/// sets and the reference pools.
#[derive(Debug)]
pub struct RowSynthesizer {
    plans: Vec<ColumnPlan>,
    overrides: Option<Arc<TableOverrides>>,
    uniques: UniquenessTracker,
    references: ReferenceSampler,
    clock: GenerationClock,
    rng: StdRng,
    rows_generated: u64,
}

impl RowSynthesizer {
    /// Create a synthesizer. Without a seed the RNG is seeded from entropy.
    pub fn new(plans: Vec<ColumnPlan>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            plans,
            overrides: None,
            uniques: UniquenessTracker::new(),
            references: ReferenceSampler::new(),
            clock: GenerationClock::now(),
            rng,
            rows_generated: 0,
        }
    }

    pub fn with_overrides(mut self, overrides: Option<Arc<TableOverrides>>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_uniques(mut self, uniques: UniquenessTracker) -> Self {
        self.uniques = uniques;
        self
    }

    pub fn with_references(mut self, references: ReferenceSampler) -> Self {
        self.references = references;
        self
    }

    pub fn with_clock(mut self, clock: GenerationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn plans(&self) -> &[ColumnPlan] {
        &self.plans
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn uniques(&self) -> &UniquenessTracker {
        &self.uniques
    }

    pub fn references(&self) -> &ReferenceSampler {
        &self.references
    }

    pub fn rows_generated(&self) -> u64 {
        self.rows_generated
    }

    /// Synthesize the next row.
    ///
    /// Every column is generated independently, in plan order.
    pub fn next_row(&mut self, observer: &mut dyn RetryObserver) -> Result<Row, GenerateError> {
        let Self {
            plans,
            overrides,
            uniques,
            references,
            clock,
            rng,
            rows_generated,
        } = self;

        let mut row = Vec::with_capacity(plans.len());

        for plan in plans.iter() {
            let value = match &plan.strategy {
                Strategy::Override => overrides
                    .as_deref()
                    .and_then(|o| o.get(&plan.name))
                    .ok_or_else(|| GenerateError::MissingOverride(plan.name.clone()))?
                    .generate(rng, plan),
                Strategy::Unique(logical_type) => {
                    let (logical_type, limit) = (*logical_type, plan.limit);
                    uniques.generate_unique(&plan.name, observer, || {
                        generate_value(rng, clock, logical_type, limit)
                    })?
                }
                Strategy::Reference(target) => {
                    references.sample(&plan.name, target, rng)?.to_string()
                }
                Strategy::Literal(logical_type) => {
                    generate_value(rng, clock, *logical_type, plan.limit)
                }
            };
            row.push(value);
        }

        *rows_generated += 1;
        Ok(row)
    }
}
