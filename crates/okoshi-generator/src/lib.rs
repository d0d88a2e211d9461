//! Row synthesis for the okoshi bulk row generator.
//!
//! This crate turns a list of [`ColumnPlan`](okoshi_core::ColumnPlan)s into
//! rows of rendered SQL literals. All randomness flows through one seeded
//! `StdRng`, so a run with a fixed seed and clock is reproducible.
//!
//! # Architecture
//!
//! ```text
//!  Vec<ColumnPlan>
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │    RowSynthesizer    │
//! │                      │
//! │  - OverrideRegistry  │  override > unique > reference > literal
//! │  - UniquenessTracker │
//! │  - ReferenceSampler  │
//! │  - generators::*     │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     Row (Vec<String>)
//! ```
//!
//! # Example
//!
//! ```rust
//! use okoshi_core::{ColumnPlan, LogicalType, Strategy};
//! use okoshi_generator::{NoopObserver, RowSynthesizer};
//!
//! let plans = vec![ColumnPlan {
//!     name: "age".to_string(),
//!     sql_type: "int(3)".to_string(),
//!     logical_type: Some(LogicalType::Integer),
//!     limit: 2,
//!     strategy: Strategy::Literal(LogicalType::Integer),
//! }];
//!
//! let mut synthesizer = RowSynthesizer::new(plans, Some(42));
//! let row = synthesizer.next_row(&mut NoopObserver).unwrap();
//! assert_eq!(row.len(), 1);
//! ```

pub mod error;
pub mod generators;
pub mod overrides;
pub mod reference;
pub mod synthesizer;
pub mod unique;

// Re-exports for convenience
pub use error::GenerateError;
pub use generators::{generate_value, GenerationClock};
pub use overrides::{ColumnOverride, OverrideRegistry, TableOverrides};
pub use reference::{ReferencePool, ReferenceSampler};
pub use synthesizer::{Row, RowSynthesizer};
pub use unique::{NoopObserver, RetryObserver, UniquenessTracker};
