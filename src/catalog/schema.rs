//! Schema definitions for PrimDB
//!
//! A schema is the ordered column list of one table. It always starts with
//! the engine-managed `ID:int` column.

use super::types::ColumnType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the implicit row identifier column
pub const ID_COLUMN: &str = "ID";

/// Column definition in a table
///
/// Persisted as a `[name, type]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, ColumnType)", into = "(String, ColumnType)")]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Parse a `name:type` spec.
    ///
    /// The spec is split on its last `:`, so the type is always the final
    /// segment.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let (name, type_name) = spec
            .rsplit_once(':')
            .ok_or_else(|| Error::MalformedColumnSpec(spec.to_string()))?;
        let column_type = type_name
            .parse()
            .map_err(|_| Error::MalformedColumnSpec(spec.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MalformedColumnSpec(spec.to_string()));
        }
        Ok(Self::new(name, column_type))
    }
}

impl From<(String, ColumnType)> for Column {
    fn from((name, column_type): (String, ColumnType)) -> Self {
        Self { name, column_type }
    }
}

impl From<Column> for (String, ColumnType) {
    fn from(column: Column) -> Self {
        (column.name, column.column_type)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.column_type)
    }
}

/// Table schema - ordered, ID-first, unique column names
///
/// Loading a schema from a file goes through the same checks as building one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Schema {
    columns: Vec<Column>,
}

impl TryFrom<Vec<Column>> for Schema {
    type Error = Error;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        match columns.first() {
            Some(first) if first.name == ID_COLUMN && first.column_type == ColumnType::Int => {}
            Some(first) => {
                return Err(Error::InvalidSchema(format!(
                    "first column is '{}', expected {}:int",
                    first, ID_COLUMN
                )))
            }
            None => return Err(Error::InvalidSchema("no columns".to_string())),
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }
}

impl From<Schema> for Vec<Column> {
    fn from(schema: Schema) -> Self {
        schema.columns
    }
}

impl Schema {
    /// Build a schema from user columns, prepending `ID:int`.
    pub fn with_user_columns(user_columns: Vec<Column>) -> Result<Self> {
        let mut columns = Vec::with_capacity(user_columns.len() + 1);
        columns.push(Column::new(ID_COLUMN, ColumnType::Int));
        columns.extend(user_columns);
        Self::try_from(columns)
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// All columns, `ID` first
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns the user supplies values for on insert
    pub fn user_columns(&self) -> &[Column] {
        &self.columns[1..]
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Renders as `ID:int, name:str, ...`
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec() {
        let col = Column::parse_spec("age:INT").unwrap();
        assert_eq!(col, Column::new("age", ColumnType::Int));

        // Split from the right, the name keeps any earlier colons.
        let col = Column::parse_spec("a:b:str").unwrap();
        assert_eq!(col.name, "a:b");
        assert_eq!(col.column_type, ColumnType::Str);

        assert!(matches!(
            Column::parse_spec("age"),
            Err(Error::MalformedColumnSpec(_))
        ));
        assert!(matches!(
            Column::parse_spec("age:float"),
            Err(Error::MalformedColumnSpec(_))
        ));
        assert!(matches!(
            Column::parse_spec(":int"),
            Err(Error::MalformedColumnSpec(_))
        ));
    }

    #[test]
    fn test_schema_is_id_first() {
        let schema = Schema::with_user_columns(vec![
            Column::new("name", ColumnType::Str),
            Column::new("active", ColumnType::Bool),
        ])
        .unwrap();

        assert_eq!(schema.column_names(), vec!["ID", "name", "active"]);
        assert_eq!(schema.columns()[0].column_type, ColumnType::Int);
        assert_eq!(schema.user_columns().len(), 2);
        assert_eq!(schema.to_string(), "ID:int, name:str, active:bool");
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let result = Schema::with_user_columns(vec![
            Column::new("name", ColumnType::Str),
            Column::new("name", ColumnType::Int),
        ]);
        assert!(matches!(result, Err(Error::DuplicateColumn(n)) if n == "name"));

        let result = Schema::with_user_columns(vec![Column::new("ID", ColumnType::Str)]);
        assert!(matches!(result, Err(Error::DuplicateColumn(n)) if n == "ID"));
    }

    #[test]
    fn test_schema_serializes_as_pairs() {
        let schema = Schema::with_user_columns(vec![Column::new("name", ColumnType::Str)]).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"[["ID","int"],["name","str"]]"#);

        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_try_from_checks_layout() {
        assert!(matches!(
            Schema::try_from(Vec::<Column>::new()),
            Err(Error::InvalidSchema(_))
        ));
        assert!(matches!(
            Schema::try_from(vec![Column::new("name", ColumnType::Str)]),
            Err(Error::InvalidSchema(_))
        ));
        assert!(matches!(
            Schema::try_from(vec![Column::new("ID", ColumnType::Bool)]),
            Err(Error::InvalidSchema(_))
        ));

        let schema = Schema::try_from(vec![Column::new("ID", ColumnType::Int)]).unwrap();
        assert!(schema.user_columns().is_empty());

        assert!(serde_json::from_str::<Schema>("[]").is_err());
        assert!(serde_json::from_str::<Schema>(r#"[["a","int"],["ID","int"]]"#).is_err());
    }
}
