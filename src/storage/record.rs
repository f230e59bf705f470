//! Records (rows) for PrimDB

use super::value::Value;
use crate::catalog::ID_COLUMN;
use indexmap::IndexMap;

/// One row: column name to value, in schema order.
pub type Record = IndexMap<String, Value>;

/// The `ID` of a record, if it holds an integer one
pub fn record_id(record: &Record) -> Option<i64> {
    record.get(ID_COLUMN).and_then(Value::as_int)
}

/// ID for the next inserted record: one past the largest ID in the table.
///
/// IDs of deleted records are never handed out again, as long as a larger
/// one survives.
pub fn next_id(records: &[Record]) -> i64 {
    records.iter().filter_map(record_id).max().map_or(1, |max| max + 1)
}
