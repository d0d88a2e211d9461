//! Per-table override generators compiled into the binary.
//!
//! Register a table's overrides here to replace the built-in generator for
//! specific columns. Overrides return a rendered literal:
//!
//! ```rust
//! use okoshi_core::{quote, ColumnPlan};
//! use okoshi_generator::{OverrideRegistry, TableOverrides};
//! use rand::{rngs::StdRng, Rng};
//!
//! let mut registry = OverrideRegistry::new();
//! registry.register(
//!     "users",
//!     TableOverrides::new().with("email", |rng: &mut StdRng, _: &ColumnPlan| {
//!         quote(&format!("user{}@example.com", rng.gen::<u32>()))
//!     }),
//! );
//! assert!(registry.for_table("users").is_some());
//! ```

use okoshi_generator::OverrideRegistry;

/// Overrides available to every populate run.
pub fn registry() -> OverrideRegistry {
    OverrideRegistry::new()
}
