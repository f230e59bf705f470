//! Value type for PrimDB
//!
//! This module defines how cell values are represented in memory and how
//! textual literals from commands turn into typed values.

use crate::catalog::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell value
///
/// Serialized natively (`1`, `"a"`, `true`) so table files stay flat JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Strip one pair of matching single or double quotes.
///
/// A lone quote character counts as both ends and yields an empty string.
pub fn unquote(raw: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if raw.starts_with(quote) && raw.ends_with(quote) {
            return Some(raw.get(1..raw.len() - 1).unwrap_or(""));
        }
    }
    None
}

impl Value {
    /// Decode a literal from command text.
    ///
    /// Quoted text is always a string. Otherwise `true`/`false` (any case)
    /// become booleans, base-10 integers become integers, and anything else
    /// is kept as a string.
    pub fn from_literal(raw: &str) -> Value {
        if let Some(inner) = unquote(raw) {
            return Value::Str(inner.to_string());
        }
        if raw.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        match raw.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Str(raw.to_string()),
        }
    }

    /// Convert to the declared type of a column.
    ///
    /// Returns `None` only when an integer is required and the textual form
    /// is not one.
    pub fn convert_to(&self, target: ColumnType) -> Option<Value> {
        match target {
            ColumnType::Int => match self {
                Value::Int(n) => Some(Value::Int(*n)),
                other => other.to_string().trim().parse().ok().map(Value::Int),
            },
            ColumnType::Str => Some(Value::Str(self.to_string())),
            ColumnType::Bool => match self {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::Str(s) => {
                    let s = s.to_ascii_lowercase();
                    Some(Value::Bool(matches!(s.as_str(), "true" | "1" | "yes")))
                }
                other => Some(Value::Bool(other.is_truthy())),
            },
        }
    }

    /// Non-zero, non-empty or `true`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
        }
    }

    /// The column type this value satisfies under strict validation
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Bool(_) => ColumnType::Bool,
            Value::Int(_) => ColumnType::Int,
            Value::Str(_) => ColumnType::Str,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"abc\""), Some("abc"));
        assert_eq!(unquote("'abc'"), Some("abc"));
        assert_eq!(unquote("\"\""), Some(""));
        assert_eq!(unquote("\"abc'"), None);
        assert_eq!(unquote("\""), Some(""));
        assert_eq!(unquote("'"), Some(""));
        assert_eq!(unquote("abc"), None);
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from_literal("\"30\""), Value::from("30"));
        assert_eq!(Value::from_literal("'true'"), Value::from("true"));
        assert_eq!(Value::from_literal("\""), Value::from(""));
        assert_eq!(Value::from_literal("TRUE"), Value::Bool(true));
        assert_eq!(Value::from_literal("False"), Value::Bool(false));
        assert_eq!(Value::from_literal("30"), Value::Int(30));
        assert_eq!(Value::from_literal("-7"), Value::Int(-7));
        assert_eq!(Value::from_literal("Alice"), Value::from("Alice"));
        assert_eq!(Value::from_literal("3.5"), Value::from("3.5"));
    }

    #[test]
    fn test_convert_to_int() {
        assert_eq!(
            Value::from("42").convert_to(ColumnType::Int),
            Some(Value::Int(42))
        );
        assert_eq!(Value::Int(7).convert_to(ColumnType::Int), Some(Value::Int(7)));
        assert_eq!(Value::from("abc").convert_to(ColumnType::Int), None);
        assert_eq!(Value::Bool(true).convert_to(ColumnType::Int), None);
    }

    #[test]
    fn test_convert_to_str() {
        assert_eq!(
            Value::Int(5).convert_to(ColumnType::Str),
            Some(Value::from("5"))
        );
        assert_eq!(
            Value::Bool(false).convert_to(ColumnType::Str),
            Some(Value::from("false"))
        );
    }

    #[test]
    fn test_convert_to_bool() {
        for truthy in ["true", "TRUE", "1", "yes", "Yes"] {
            assert_eq!(
                Value::from(truthy).convert_to(ColumnType::Bool),
                Some(Value::Bool(true)),
                "{truthy}"
            );
        }
        for falsy in ["false", "0", "no", "notabool", ""] {
            assert_eq!(
                Value::from(falsy).convert_to(ColumnType::Bool),
                Some(Value::Bool(false)),
                "{falsy}"
            );
        }
        assert_eq!(
            Value::Bool(true).convert_to(ColumnType::Bool),
            Some(Value::Bool(true))
        );
        assert_eq!(Value::Int(3).convert_to(ColumnType::Bool), Some(Value::Bool(true)));
        assert_eq!(Value::Int(0).convert_to(ColumnType::Bool), Some(Value::Bool(false)));
    }

    #[test]
    fn test_equality_is_type_sensitive() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_ne!(Value::Bool(true), Value::from("true"));
    }

    #[test]
    fn test_native_json() {
        let values = vec![Value::Int(1), Value::from("a"), Value::Bool(true)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,"a",true]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);

        assert!(serde_json::from_str::<Value>("1.5").is_err());
        assert!(serde_json::from_str::<Value>("null").is_err());
    }
}
