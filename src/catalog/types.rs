//! Column types for PrimDB
//!
//! Tables declare every column as one of three types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Signed 64-bit integer
    Int,
    /// UTF-8 text
    Str,
    /// Boolean
    Bool,
}

impl ColumnType {
    /// Name used in column specs and in the catalog file
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Str => "str",
            ColumnType::Bool => "bool",
        }
    }
}

impl FromStr for ColumnType {
    type Err = ();

    /// Matches `int`, `str` or `bool`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(ColumnType::Int),
            "str" => Ok(ColumnType::Str),
            "bool" => Ok(ColumnType::Bool),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type() {
        assert_eq!("int".parse::<ColumnType>(), Ok(ColumnType::Int));
        assert_eq!(" STR ".parse::<ColumnType>(), Ok(ColumnType::Str));
        assert_eq!("Bool".parse::<ColumnType>(), Ok(ColumnType::Bool));
        assert_eq!("float".parse::<ColumnType>(), Err(()));
        assert_eq!("".parse::<ColumnType>(), Err(()));
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&ColumnType::Bool).unwrap();
        assert_eq!(json, "\"bool\"");
        let parsed: ColumnType = serde_json::from_str("\"int\"").unwrap();
        assert_eq!(parsed, ColumnType::Int);
    }
}
