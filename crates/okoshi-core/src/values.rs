//! Rendered SQL literals.
//!
//! Everything the generator emits is already a rendered literal: numbers
//! are bare, textual values are escaped and wrapped in single quotes.
//! Binary values that are not valid UTF-8 render as hex literals (`X'..'`).

use std::fmt;
use std::fmt::Write as _;

/// Backslash-escape every single quote.
///
/// This is the only escaping performed. `don't` becomes `don\'t`.
pub fn escape(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Escape and wrap a value in single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", escape(value))
}

/// An existing value read back from a database column.
///
/// Reference pools and uniqueness seeds are built from these.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlLiteral {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    /// Raw bytes that are not valid UTF-8.
    Bytes(Vec<u8>),
}

impl SqlLiteral {
    /// Render the value the way it is spliced into an INSERT statement.
    pub fn render(&self) -> String {
        match self {
            SqlLiteral::Null => "NULL".to_string(),
            SqlLiteral::Integer(v) => v.to_string(),
            SqlLiteral::Float(v) => v.to_string(),
            SqlLiteral::Text(v) => quote(v),
            SqlLiteral::Bytes(bytes) => {
                let mut rendered = String::with_capacity(bytes.len() * 2 + 3);
                rendered.push_str("X'");
                for byte in bytes {
                    let _ = write!(rendered, "{byte:02x}");
                }
                rendered.push('\'');
                rendered
            }
        }
    }

    /// Text when `bytes` is valid UTF-8, raw bytes otherwise.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => SqlLiteral::Text(text),
            Err(e) => SqlLiteral::Bytes(e.into_bytes()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlLiteral::Null)
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for SqlLiteral {
    fn from(value: i64) -> Self {
        SqlLiteral::Integer(value)
    }
}

impl From<&str> for SqlLiteral {
    fn from(value: &str) -> Self {
        SqlLiteral::Text(value.to_string())
    }
}

impl From<String> for SqlLiteral {
    fn from(value: String) -> Self {
        SqlLiteral::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape(rendered: &str) -> String {
        rendered
            .trim_start_matches('\'')
            .trim_end_matches('\'')
            .replace("\\'", "'")
    }

    #[test]
    fn test_escape_single_quote() {
        assert_eq!(escape("don't"), "don\\'t");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_quote_round_trip() {
        let original = "it's o'clock";
        let rendered = quote(original);
        assert_eq!(rendered, "'it\\'s o\\'clock'");
        assert_eq!(unescape(&rendered), original);
    }

    #[test]
    fn test_render_literals() {
        assert_eq!(SqlLiteral::Null.render(), "NULL");
        assert_eq!(SqlLiteral::Integer(42).render(), "42");
        assert_eq!(SqlLiteral::Float(1.5).render(), "1.5");
        assert_eq!(SqlLiteral::from("O'Brien").render(), "'O\\'Brien'");
    }

    #[test]
    fn test_binary_values_keep_every_byte() {
        let literal = SqlLiteral::from_bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00]);
        assert_eq!(literal, SqlLiteral::Bytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00]));
        assert_eq!(literal.render(), "X'deadbeef00'");

        assert_eq!(
            SqlLiteral::from_bytes(b"plain".to_vec()),
            SqlLiteral::Text("plain".to_string())
        );
        assert_eq!(SqlLiteral::Bytes(Vec::new()).render(), "X''");
    }
}
