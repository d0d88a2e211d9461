//! Column metadata and per-column generation plans.
//!
//! ## Type Hierarchy
//!
//! - `ColumnMetadata` - One column as reported by schema introspection
//! - `ColumnPlan` - How the generator fills one column, built once per run
//! - `ReferenceSpec` - A reference target as written in configuration
//! - `ReferenceTarget` - The normalized `(table, column)` pair

use crate::types::LogicalType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Error Types
// ============================================================================

/// Configuration problems detected before any row is generated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The declared SQL type has no built-in generator
    #[error("Column '{column}' has unsupported type '{sql_type}' (register an override or a reference for it)")]
    UnsupportedType { column: String, sql_type: String },

    /// A reference target could not be parsed
    #[error("Malformed reference for column '{column}': '{spec}' (expected 'table.column')")]
    MalformedReference { column: String, spec: String },

    /// A configured column does not exist in the target table
    #[error("Column '{column}' listed in {option} does not exist in table '{table}'")]
    UnknownColumn {
        table: String,
        column: String,
        option: &'static str,
    },

    /// Chunk size must be positive
    #[error("Step size must be greater than zero")]
    InvalidStep,

    /// No target table was given
    #[error("No target table given")]
    MissingTable,

    /// A duration setting could not be parsed
    #[error("Invalid duration '{0}' (expected e.g. '50ms', '1s', '2m' or plain milliseconds)")]
    InvalidDuration(String),
}

// ============================================================================
// Introspected Columns
// ============================================================================

/// One column of the target table, as reported by the schema collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Declared SQL type, e.g. `int(11)` or `varchar(255)`
    pub sql_type: String,

    /// Whether the database assigns this column's value
    #[serde(default)]
    pub auto_increment: bool,

    /// Whether this is a virtual/computed column
    #[serde(default)]
    pub virtual_column: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            auto_increment: false,
            virtual_column: false,
        }
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn virtual_column(mut self) -> Self {
        self.virtual_column = true;
        self
    }
}

/// Limit used when the declared type carries no size.
pub const DEFAULT_LIMIT: u32 = 10;

/// Extract the size limit from a declared SQL type.
///
/// Takes the first run of digits (`int(11)` -> 11, `varchar(255)` -> 255),
/// defaults to [`DEFAULT_LIMIT`], caps at 10 and subtracts one. The result is
/// a digit count for numeric columns and a character count for strings; it
/// does not reflect the real byte width of integer columns.
pub fn extract_limit(sql_type: &str) -> u32 {
    let digits: String = sql_type
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    let declared = digits.parse::<u32>().unwrap_or(DEFAULT_LIMIT);
    declared.min(DEFAULT_LIMIT).saturating_sub(1)
}

// ============================================================================
// References
// ============================================================================

/// The `(table, column)` a reference column draws its values from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceTarget {
    pub table: String,
    pub column: String,
}

impl ReferenceTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse the dotted `table.column` form.
    pub fn parse_dotted(column: &str, spec: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedReference {
            column: column.to_string(),
            spec: spec.to_string(),
        };

        let (table, target) = spec.split_once('.').ok_or_else(malformed)?;
        if table.is_empty() || target.is_empty() || target.contains('.') {
            return Err(malformed());
        }
        Ok(Self::new(table.trim(), target.trim()))
    }
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl FromStr for ReferenceTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_dotted("", s)
    }
}

/// A reference target as it appears in configuration.
///
/// All three forms normalize to the same [`ReferenceTarget`]:
///
/// ```yaml
/// refs:
///   account_id: { table: accounts, column: id }
///   owner_id: [owners, id]
///   team_id: teams.id
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceSpec {
    Pair { table: String, column: String },
    List([String; 2]),
    Dotted(String),
}

impl ReferenceSpec {
    /// Normalize into a [`ReferenceTarget`] for the given referencing column.
    pub fn normalize(&self, column: &str) -> Result<ReferenceTarget, ConfigError> {
        let malformed = |spec: String| ConfigError::MalformedReference {
            column: column.to_string(),
            spec,
        };

        match self {
            ReferenceSpec::Pair { table, column: target }
            | ReferenceSpec::List([table, target]) => {
                if table.is_empty() || target.is_empty() {
                    Err(malformed(format!("{table}.{target}")))
                } else {
                    Ok(ReferenceTarget::new(table.clone(), target.clone()))
                }
            }
            ReferenceSpec::Dotted(spec) => ReferenceTarget::parse_dotted(column, spec),
        }
    }
}

impl From<ReferenceTarget> for ReferenceSpec {
    fn from(target: ReferenceTarget) -> Self {
        ReferenceSpec::Pair {
            table: target.table,
            column: target.column,
        }
    }
}

// ============================================================================
// Column Plans
// ============================================================================

/// How a planned column gets its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// A per-table override registered for this column name
    Override,
    /// Type-based generation, retried until the value is new for this column
    Unique(LogicalType),
    /// Sampled from the distinct values of another table's column
    Reference(ReferenceTarget),
    /// Plain type-based generation
    Literal(LogicalType),
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Override => f.write_str("override"),
            Strategy::Unique(t) => write!(f, "unique {t}"),
            Strategy::Reference(target) => write!(f, "reference -> {target}"),
            Strategy::Literal(t) => write!(f, "literal {t}"),
        }
    }
}

/// Immutable instructions for filling one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub name: String,
    pub sql_type: String,
    /// `None` when the declared type has no built-in generator
    pub logical_type: Option<LogicalType>,
    pub limit: u32,
    pub strategy: Strategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_limit() {
        assert_eq!(extract_limit("int(11)"), 9);
        assert_eq!(extract_limit("varchar(255)"), 9);
        assert_eq!(extract_limit("varchar(5)"), 4);
        assert_eq!(extract_limit("decimal(4,2)"), 3);
        assert_eq!(extract_limit("tinyint(1)"), 0);
        assert_eq!(extract_limit("datetime"), 9);
        assert_eq!(extract_limit("text"), 9);
        assert_eq!(extract_limit("bit(0)"), 0);
    }

    #[test]
    fn test_reference_forms_normalize_identically() {
        let expected = ReferenceTarget::new("accounts", "id");

        let yaml = r#"
pair: { table: accounts, column: id }
list: [accounts, id]
dotted: accounts.id
"#;
        let specs: std::collections::BTreeMap<String, ReferenceSpec> =
            serde_yaml::from_str(yaml).unwrap();

        assert_eq!(specs.len(), 3);
        for (column, spec) in &specs {
            assert_eq!(spec.normalize(column).unwrap(), expected);
        }
    }

    #[test]
    fn test_reference_from_json_pair() {
        let spec: ReferenceSpec =
            serde_json::from_str(r#"{"table": "owners", "column": "id"}"#).unwrap();
        assert_eq!(
            spec.normalize("owner_id").unwrap(),
            ReferenceTarget::new("owners", "id")
        );
    }

    #[test]
    fn test_malformed_dotted_reference() {
        for bad in ["owners", ".id", "owners.", "a.b.c"] {
            let err = ReferenceSpec::Dotted(bad.to_string())
                .normalize("owner_id")
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::MalformedReference { ref column, .. } if column == "owner_id"),
                "expected malformed reference for {bad}"
            );
        }
    }

    #[test]
    fn test_reference_target_display() {
        assert_eq!(ReferenceTarget::new("owners", "id").to_string(), "owners.id");
        let parsed: ReferenceTarget = "owners.id".parse().unwrap();
        assert_eq!(parsed, ReferenceTarget::new("owners", "id"));
    }

    #[test]
    fn test_column_metadata_builders() {
        let column = ColumnMetadata::new("id", "int(11)").auto_increment();
        assert!(column.auto_increment);
        assert!(!column.virtual_column);
    }
}
