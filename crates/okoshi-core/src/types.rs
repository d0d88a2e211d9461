//! Logical column types.
//!
//! Declared SQL types are folded into a small closed set of logical types,
//! each of which has exactly one built-in value generator.

use crate::values::{quote, SqlLiteral};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The abstract category a declared SQL column type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    Integer,
    Float,
    String,
    Text,
    Boolean,
    Date,
    Datetime,
    Json,
}

impl LogicalType {
    /// Map a declared SQL type (e.g. `int(11)`, `varchar(255)`, `tinyint(1)`)
    /// to its logical type.
    ///
    /// Returns `None` for types with no built-in generator.
    pub fn from_sql_type(sql_type: &str) -> Option<Self> {
        let lowered = sql_type.trim().to_lowercase();

        // MySQL uses TINYINT(1) and BIT(1) for booleans
        if lowered.starts_with("tinyint(1)") || lowered.starts_with("bit(1)") {
            return Some(LogicalType::Boolean);
        }

        let base = lowered
            .split(|c: char| c == '(' || c == ' ')
            .next()
            .unwrap_or_default();

        match base {
            "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" | "serial"
            | "bigserial" | "smallserial" => Some(LogicalType::Integer),
            "float" | "double" | "real" | "decimal" | "numeric" => Some(LogicalType::Float),
            "char" | "varchar" | "character" | "enum" | "set" => Some(LogicalType::String),
            "tinytext" | "text" | "mediumtext" | "longtext" => Some(LogicalType::Text),
            "bool" | "boolean" => Some(LogicalType::Boolean),
            "date" => Some(LogicalType::Date),
            "datetime" | "timestamp" => Some(LogicalType::Datetime),
            "json" | "jsonb" => Some(LogicalType::Json),
            _ => None,
        }
    }

    /// Whether generated values of this type are quoted strings.
    pub fn is_quoted(&self) -> bool {
        !matches!(
            self,
            LogicalType::Integer | LogicalType::Float | LogicalType::Boolean
        )
    }

    /// Render a value already stored in the database exactly as the generator
    /// would have rendered it, so the two can be compared for uniqueness.
    pub fn render_existing(&self, value: &SqlLiteral) -> String {
        match (self, value) {
            (_, SqlLiteral::Null) => value.render(),
            (LogicalType::Integer | LogicalType::Float | LogicalType::Boolean, SqlLiteral::Text(raw)) => {
                match raw.parse::<f64>() {
                    Ok(parsed) if parsed.fract() == 0.0 && parsed.abs() < 1e15 => {
                        format!("{}", parsed as i64)
                    }
                    _ => raw.clone(),
                }
            }
            (LogicalType::Integer | LogicalType::Float | LogicalType::Boolean, _) => value.render(),
            (_, SqlLiteral::Bytes(_)) => value.render(),
            (LogicalType::Date, SqlLiteral::Text(raw)) => quote(raw.get(..10).unwrap_or(raw)),
            (LogicalType::Datetime, SqlLiteral::Text(raw)) => quote(raw.get(..19).unwrap_or(raw)),
            (_, SqlLiteral::Text(raw)) => quote(raw),
            (_, SqlLiteral::Integer(v)) => quote(&v.to_string()),
            (_, SqlLiteral::Float(v)) => quote(&v.to_string()),
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalType::Integer => "integer",
            LogicalType::Float => "float",
            LogicalType::String => "string",
            LogicalType::Text => "text",
            LogicalType::Boolean => "boolean",
            LogicalType::Date => "date",
            LogicalType::Datetime => "datetime",
            LogicalType::Json => "json",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sql_type() {
        assert_eq!(LogicalType::from_sql_type("int(11)"), Some(LogicalType::Integer));
        assert_eq!(LogicalType::from_sql_type("BIGINT unsigned"), Some(LogicalType::Integer));
        assert_eq!(LogicalType::from_sql_type("tinyint(1)"), Some(LogicalType::Boolean));
        assert_eq!(LogicalType::from_sql_type("tinyint(4)"), Some(LogicalType::Integer));
        assert_eq!(LogicalType::from_sql_type("decimal(10,2)"), Some(LogicalType::Float));
        assert_eq!(LogicalType::from_sql_type("varchar(255)"), Some(LogicalType::String));
        assert_eq!(
            LogicalType::from_sql_type("character varying(40)"),
            Some(LogicalType::String)
        );
        assert_eq!(LogicalType::from_sql_type("mediumtext"), Some(LogicalType::Text));
        assert_eq!(LogicalType::from_sql_type("date"), Some(LogicalType::Date));
        assert_eq!(LogicalType::from_sql_type("datetime(6)"), Some(LogicalType::Datetime));
        assert_eq!(LogicalType::from_sql_type("timestamp"), Some(LogicalType::Datetime));
        assert_eq!(LogicalType::from_sql_type("json"), Some(LogicalType::Json));
        assert_eq!(LogicalType::from_sql_type("geometry"), None);
        assert_eq!(LogicalType::from_sql_type("blob"), None);
    }

    #[test]
    fn test_render_existing_matches_generated_shape() {
        assert_eq!(
            LogicalType::Integer.render_existing(&SqlLiteral::Integer(12)),
            "12"
        );
        assert_eq!(
            LogicalType::Float.render_existing(&SqlLiteral::Text("40.00".into())),
            "40"
        );
        assert_eq!(
            LogicalType::String.render_existing(&SqlLiteral::Text("a1b2".into())),
            "'a1b2'"
        );
        assert_eq!(
            LogicalType::Date.render_existing(&SqlLiteral::Text("2001-02-03 00:00:00".into())),
            "'2001-02-03'"
        );
        assert_eq!(
            LogicalType::Datetime
                .render_existing(&SqlLiteral::Text("2001-02-03 04:05:06.000000".into())),
            "'2001-02-03 04:05:06'"
        );
    }
}
