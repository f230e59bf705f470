//! WHERE and SET clause parsing
//!
//! Clauses are `column = literal` equalities. A WHERE clause holds one of
//! them; a SET clause is a comma-separated list.
//!
//! Both split on the first `=` before looking at quotes, so a quoted value
//! that itself contains `=` or `,` is cut short.

use crate::storage::Value;
use indexmap::IndexMap;

/// Conjunction of equality tests, column to expected value
pub type WhereClause = IndexMap<String, Value>;

/// Assignments applied by an update, column to new value
pub type SetClause = IndexMap<String, Value>;

/// Parse `column = literal`.
///
/// Returns `None` for empty text or text without `=`.
pub fn parse_equality(text: &str) -> Option<(String, Value)> {
    let (column, value) = text.split_once('=')?;
    let column = column.trim();
    Some((column.to_string(), Value::from_literal(value.trim())))
}

/// Parse a WHERE clause holding a single equality.
pub fn parse_where(text: &str) -> Option<WhereClause> {
    let (column, value) = parse_equality(text)?;
    Some(WhereClause::from([(column, value)]))
}

/// Parse `a = 1, b = "x", ...`.
///
/// Segments without `=` are skipped. A repeated column keeps its last value.
pub fn parse_assignment_list(text: &str) -> SetClause {
    let mut assignments = SetClause::new();
    for (column, value) in text.split(',').filter_map(parse_equality) {
        assignments.insert(column, value);
    }
    assignments
}
