//! Error type for row synthesis.

use okoshi_core::ReferenceTarget;

/// Errors raised while synthesizing a row.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A bounded uniqueness retry ran out of attempts
    #[error("Could not generate a unique value for column '{column}' after {attempts} retries (the value space is probably smaller than the row count)")]
    UniquenessExhausted { column: String, attempts: u64 },

    /// A reference column has no candidate values to sample from
    #[error("Reference pool for column '{column}' is empty: '{target}' has no rows")]
    ReferencePoolEmpty {
        column: String,
        target: ReferenceTarget,
    },

    /// A reference column was planned but its pool was never loaded
    #[error("No reference pool loaded for column '{column}' (expected values from '{target}')")]
    ReferencePoolMissing {
        column: String,
        target: ReferenceTarget,
    },

    /// An override column was planned but no override is registered
    #[error("No override registered for column '{0}'")]
    MissingOverride(String),
}
