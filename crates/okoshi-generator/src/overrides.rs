//! Per-table override generators.
//!
//! An override replaces every built-in strategy for one column of one table.
//! Overrides return a fully rendered literal; use [`okoshi_core::quote`] for
//! textual values.

use okoshi_core::ColumnPlan;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Generates the value for one overridden column.
pub trait ColumnOverride: Send + Sync {
    fn generate(&self, rng: &mut StdRng, column: &ColumnPlan) -> String;
}

impl<F> ColumnOverride for F
where
    F: Fn(&mut StdRng, &ColumnPlan) -> String + Send + Sync,
{
    fn generate(&self, rng: &mut StdRng, column: &ColumnPlan) -> String {
        self(rng, column)
    }
}

/// Overrides for the columns of a single table.
#[derive(Default)]
pub struct TableOverrides {
    columns: HashMap<String, Box<dyn ColumnOverride>>,
}

impl TableOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override for `column`, replacing any previous one.
    pub fn with(mut self, column: impl Into<String>, generator: impl ColumnOverride + 'static) -> Self {
        self.columns.insert(column.into(), Box::new(generator));
        self
    }

    pub fn get(&self, column: &str) -> Option<&dyn ColumnOverride> {
        self.columns.get(column).map(Box::as_ref)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Overridden column names, sorted.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TableOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOverrides")
            .field("columns", &self.column_names())
            .finish()
    }
}

/// Table name -> overrides, looked up once when the column plan is built.
#[derive(Debug, Default)]
pub struct OverrideRegistry {
    tables: HashMap<String, Arc<TableOverrides>>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, table: impl Into<String>, overrides: TableOverrides) {
        self.tables.insert(table.into(), Arc::new(overrides));
    }

    pub fn for_table(&self, table: &str) -> Option<Arc<TableOverrides>> {
        self.tables.get(table).cloned()
    }
}
