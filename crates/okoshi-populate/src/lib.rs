//! Bulk population of one table with synthetic rows.
//!
//! This crate ties the generator to a database through three small
//! collaborator traits (see [`source`]) and drives the chunked insert loop:
//!
//! ```text
//! SchemaSource ──► build_column_plans ──► RowSynthesizer
//!                                              │
//!       chunk_sizes(total, step) ──► BatchInsertBuilder ──► StatementExecutor
//!                                              │
//!                                       ProgressReporter
//! ```
//!
//! Database-specific crates (`okoshi-populate-mysql`) implement the traits.

pub mod args;
pub mod batch;
pub mod error;
pub mod options;
pub mod plan;
pub mod populator;
pub mod progress;
pub mod source;

pub use args::CommonPopulateArgs;
pub use batch::{chunk_sizes, BatchInsertBuilder, ChunkSizes};
pub use error::PopulateError;
pub use options::{PopulateOptions, RunConfig, DEFAULT_PAUSE, DEFAULT_STEP, DEFAULT_TOTAL};
pub use plan::build_column_plans;
pub use populator::{PopulateMetrics, Populator};
pub use progress::ProgressReporter;
pub use source::{ReferenceSource, SchemaSource, SourceError, StatementExecutor, TargetDatabase};
