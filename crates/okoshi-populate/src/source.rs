//! Collaborator traits between the populate loop and a concrete database.

use async_trait::async_trait;
use okoshi_core::{ColumnMetadata, SqlLiteral};

/// Error returned by a collaborator; wrapped with context by the populator.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Schema introspection.
#[async_trait]
pub trait SchemaSource: Send {
    async fn table_exists(&mut self, table: &str) -> Result<bool, SourceError>;

    /// Columns of `table` in declaration order.
    async fn columns(&mut self, table: &str) -> Result<Vec<ColumnMetadata>, SourceError>;
}

/// Existing data lookups.
#[async_trait]
pub trait ReferenceSource: Send {
    /// Every distinct value currently stored in `table.column`.
    async fn distinct_values(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<Vec<SqlLiteral>, SourceError>;
}

/// Statement execution.
#[async_trait]
pub trait StatementExecutor: Send {
    /// Execute one statement inside its own transaction and commit it.
    async fn execute_in_transaction(&mut self, statement: &str) -> Result<(), SourceError>;
}

/// Everything the populator needs from a database.
pub trait TargetDatabase: SchemaSource + ReferenceSource + StatementExecutor {}

impl<T> TargetDatabase for T where T: SchemaSource + ReferenceSource + StatementExecutor {}
