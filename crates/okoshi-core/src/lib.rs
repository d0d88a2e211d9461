//! Core types for the okoshi bulk row generator.
//!
//! This crate provides the foundational types shared by the generator and
//! the populators:
//!
//! - [`LogicalType`] - The abstract category a declared SQL type maps to
//! - [`SqlLiteral`] - Existing column values handed back by a database
//! - [`ColumnMetadata`] - One introspected column of the target table
//! - [`ColumnPlan`] - Immutable per-column generation instructions
//! - [`ReferenceTarget`] - The `(table, column)` a reference column samples from
//!
//! # Architecture
//!
//! ```text
//! okoshi-core (this crate)
//!    │
//!    ├─── okoshi-generator      (value generators, uniqueness, references)
//!    │
//!    └─── okoshi-populate       (plan building, batching, progress)
//!            │
//!            └─── okoshi-populate-mysql
//! ```

pub mod schema;
pub mod types;
pub mod values;

pub use schema::{
    extract_limit, ColumnMetadata, ColumnPlan, ConfigError, ReferenceSpec, ReferenceTarget,
    Strategy, DEFAULT_LIMIT,
};
pub use types::LogicalType;
pub use values::{escape, quote, SqlLiteral};
