//! Reference sampling from another table's column.

use crate::error::GenerateError;
use okoshi_core::{ReferenceTarget, SqlLiteral};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Fixed candidate values for one reference column, already rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePool {
    target: ReferenceTarget,
    values: Vec<String>,
}

impl ReferencePool {
    /// Build a pool from the distinct values of `target`.
    ///
    /// Duplicates are dropped, first occurrence wins.
    pub fn new(target: ReferenceTarget, values: impl IntoIterator<Item = SqlLiteral>) -> Self {
        let mut seen = HashSet::new();
        let values = values
            .into_iter()
            .map(|v| v.render())
            .filter(|v| seen.insert(v.clone()))
            .collect();
        Self { target, values }
    }

    pub fn target(&self) -> &ReferenceTarget {
        &self.target
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Candidate pools keyed by referencing column name.
///
/// Pools are loaded once at setup and never change afterwards.
#[derive(Debug, Default)]
pub struct ReferenceSampler {
    pools: HashMap<String, ReferencePool>,
}

impl ReferenceSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, pool: ReferencePool) {
        self.pools.insert(column.into(), pool);
    }

    pub fn pool(&self, column: &str) -> Option<&ReferencePool> {
        self.pools.get(column)
    }

    /// Fail on the first empty pool, naming the column and its target.
    pub fn ensure_populated(&self) -> Result<(), GenerateError> {
        let mut columns: Vec<_> = self.pools.iter().collect();
        columns.sort_by(|a, b| a.0.cmp(b.0));

        match columns.into_iter().find(|(_, pool)| pool.is_empty()) {
            Some((column, pool)) => Err(GenerateError::ReferencePoolEmpty {
                column: column.clone(),
                target: pool.target.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Draw one value for `column`, uniformly and with replacement.
    pub fn sample<R: Rng>(
        &self,
        column: &str,
        target: &ReferenceTarget,
        rng: &mut R,
    ) -> Result<&str, GenerateError> {
        let pool = self
            .pools
            .get(column)
            .ok_or_else(|| GenerateError::ReferencePoolMissing {
                column: column.to_string(),
                target: target.clone(),
            })?;

        pool.values
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| GenerateError::ReferencePoolEmpty {
                column: column.to_string(),
                target: pool.target.clone(),
            })
    }
}
