//! Run options and the YAML run-config file.

use crate::error::PopulateError;
use okoshi_core::{ConfigError, ReferenceSpec, ReferenceTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default number of rows to insert.
pub const DEFAULT_TOTAL: u64 = 10_000;

/// Default rows per INSERT statement.
pub const DEFAULT_STEP: u64 = 1_000;

/// Default pause after each committed chunk.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(50);

/// Everything a single populate run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateOptions {
    /// Target table
    pub table: String,
    /// Rows to insert in total
    pub total: u64,
    /// Rows per INSERT statement
    pub step: u64,
    /// Columns whose values must not repeat
    pub uniqs: Vec<String>,
    /// Columns left to the database default
    pub nulls: Vec<String>,
    /// Columns sampled from another table's column
    pub refs: BTreeMap<String, ReferenceSpec>,
    /// Retry cap for unique columns; `None` retries forever
    pub max_unique_retries: Option<u64>,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Pause after each committed chunk
    pub pause: Duration,
}

impl PopulateOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            total: DEFAULT_TOTAL,
            step: DEFAULT_STEP,
            uniqs: Vec::new(),
            nulls: Vec::new(),
            refs: BTreeMap::new(),
            max_unique_retries: None,
            seed: None,
            pause: DEFAULT_PAUSE,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub fn with_unique(mut self, column: impl Into<String>) -> Self {
        self.uniqs.push(column.into());
        self
    }

    pub fn with_null(mut self, column: impl Into<String>) -> Self {
        self.nulls.push(column.into());
        self
    }

    pub fn with_reference(mut self, column: impl Into<String>, spec: impl Into<ReferenceSpec>) -> Self {
        self.refs.insert(column.into(), spec.into());
        self
    }

    pub fn with_max_unique_retries(mut self, max: Option<u64>) -> Self {
        self.max_unique_retries = max;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Normalize every reference spec to a `(table, column)` pair.
    pub fn reference_targets(&self) -> Result<BTreeMap<String, ReferenceTarget>, ConfigError> {
        self.refs
            .iter()
            .map(|(column, spec)| Ok((column.clone(), spec.normalize(column)?)))
            .collect()
    }

    /// Reject options that cannot produce a valid run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::InvalidStep);
        }
        self.reference_targets().map(|_| ())
    }
}

/// Optional settings loaded from a YAML run-config file.
///
/// ```yaml
/// table: users
/// total: 100000
/// step: 1000
/// pause: 50ms
/// uniqs: [email]
/// nulls: [deleted_at]
/// refs:
///   account_id: { table: accounts, column: id }
///   team_id: teams.id
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub table: Option<String>,
    pub total: Option<u64>,
    pub step: Option<u64>,
    pub uniqs: Vec<String>,
    pub nulls: Vec<String>,
    pub refs: BTreeMap<String, ReferenceSpec>,
    pub max_unique_retries: Option<u64>,
    pub seed: Option<u64>,
    /// Pause after each chunk, e.g. `50ms` or `1s`
    pub pause: Option<String>,
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, PopulateError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PopulateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
