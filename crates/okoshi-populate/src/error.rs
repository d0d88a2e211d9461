//! Error types for population runs.

use crate::source::SourceError;
use okoshi_core::ConfigError;
use okoshi_generator::GenerateError;
use thiserror::Error;

/// Errors that can occur while populating a table.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// The target table does not exist.
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// Invalid options or an unplannable schema.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Row synthesis failed.
    #[error("Generator error: {0}")]
    Generate(#[from] GenerateError),

    /// Schema or reference lookup failed.
    #[error("Schema lookup failed: {context}")]
    Schema {
        context: String,
        #[source]
        source: SourceError,
    },

    /// A chunk's INSERT failed. Earlier chunks stay committed.
    #[error("Chunk {chunk} failed after {rows_committed} committed rows")]
    Execution {
        chunk: u64,
        rows_committed: u64,
        #[source]
        source: SourceError,
    },

    /// Reading the run config or writing progress failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run-config file is not valid YAML.
    #[error("Failed to parse run config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PopulateError {
    pub(crate) fn schema(context: impl Into<String>, source: SourceError) -> Self {
        PopulateError::Schema {
            context: context.into(),
            source,
        }
    }
}
