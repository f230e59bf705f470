//! Record engine for PrimDB
//!
//! Pure operations over a table's record list: building records for insert,
//! filtering, updating and deleting by equality clauses, validation and
//! summaries. Nothing here touches storage; the caller loads the records
//! and writes them back.

use std::fmt;

use tracing::debug;

use crate::catalog::{Schema, ID_COLUMN};
use crate::error::{Error, Result};
use crate::sql::{SetClause, WhereClause};
use crate::storage::value::unquote;
use crate::storage::{record_id, Record, Value};

/// Records touched by an update or delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Number of matched records
    pub count: usize,
    /// IDs of matched records, in table order
    pub ids: Vec<i64>,
}

impl MutationOutcome {
    fn record(&mut self, record: &Record) {
        self.count += 1;
        if let Some(id) = record_id(record) {
            self.ids.push(id);
        }
    }
}

/// Check a record against its table's schema.
///
/// Every column must be present and hold exactly the declared type; `1` is
/// not a valid `bool`.
pub fn validate(record: &Record, schema: &Schema) -> Result<()> {
    for column in schema.columns() {
        let value = record
            .get(&column.name)
            .ok_or_else(|| Error::MissingColumn(column.name.clone()))?;
        if value.column_type() != column.column_type {
            return Err(Error::TypeMismatch {
                column: column.name.clone(),
                expected: column.column_type,
            });
        }
    }
    Ok(())
}

/// Build a record from raw insert values, one per non-`ID` column.
///
/// Quoted values are stored verbatim as strings whatever the column type;
/// unquoted ones are converted to the column's type. `ID` is left at `0`
/// for the caller to assign.
pub fn insert<S: AsRef<str>>(schema: &Schema, raw_values: &[S]) -> Result<Record> {
    let columns = schema.user_columns();
    if raw_values.len() != columns.len() {
        return Err(Error::ArityMismatch {
            expected: columns.len(),
            found: raw_values.len(),
        });
    }

    let mut record = Record::with_capacity(schema.column_count());
    record.insert(ID_COLUMN.to_string(), Value::Int(0));

    for (column, raw) in columns.iter().zip(raw_values) {
        let raw = raw.as_ref().trim();
        let value = match unquote(raw) {
            Some(literal) => Value::Str(literal.to_string()),
            None => Value::Str(raw.to_string())
                .convert_to(column.column_type)
                .ok_or_else(|| Error::TypeConversion {
                    column: column.name.clone(),
                    value: raw.to_string(),
                    target: column.column_type,
                })?,
        };
        record.insert(column.name.clone(), value);
    }

    Ok(record)
}

/// Every clause column is present with an equal value.
///
/// Equality is type-sensitive: `1`, `true` and `"1"` are all different.
pub fn matches(record: &Record, clause: &WhereClause) -> bool {
    clause
        .iter()
        .all(|(column, expected)| record.get(column) == Some(expected))
}

/// Records matching the clause, in table order. No clause matches all.
pub fn select(records: &[Record], clause: Option<&WhereClause>) -> Vec<Record> {
    match clause {
        None => records.to_vec(),
        Some(clause) => records
            .iter()
            .filter(|record| matches(record, clause))
            .cloned()
            .collect(),
    }
}

/// Apply assignments to every matching record, in place.
///
/// All assignments are checked against the schema first; on any error no
/// record is touched.
pub fn update(
    records: &mut [Record],
    schema: &Schema,
    assignments: &SetClause,
    clause: &WhereClause,
) -> Result<MutationOutcome> {
    for (column, value) in assignments {
        let declared = schema
            .get_column(column)
            .ok_or_else(|| Error::UnknownColumn(column.clone()))?;
        if column == ID_COLUMN {
            return Err(Error::ReadOnlyColumn(column.clone()));
        }
        if value.column_type() != declared.column_type {
            return Err(Error::TypeMismatch {
                column: column.clone(),
                expected: declared.column_type,
            });
        }
    }

    let mut outcome = MutationOutcome::default();
    for record in records.iter_mut().filter(|record| matches(record, clause)) {
        for (column, value) in assignments {
            if let Some(slot) = record.get_mut(column) {
                *slot = value.clone();
            }
        }
        outcome.record(record);
    }
    debug!(count = outcome.count, ids = ?outcome.ids, "records updated");
    Ok(outcome)
}

/// Remove every matching record, keeping the order of the rest.
pub fn delete(records: &mut Vec<Record>, clause: &WhereClause) -> MutationOutcome {
    let mut outcome = MutationOutcome::default();
    records.retain(|record| {
        if matches(record, clause) {
            outcome.record(record);
            false
        } else {
            true
        }
    });
    debug!(count = outcome.count, ids = ?outcome.ids, "records deleted");
    outcome
}

/// Summary shown by `info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table: String,
    /// `ID:int, name:str, ...`
    pub columns: String,
    pub record_count: usize,
}

pub fn describe(table: &str, schema: &Schema, records: &[Record]) -> TableSummary {
    TableSummary {
        table: table.to_string(),
        columns: schema.to_string(),
        record_count: records.len(),
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.table)?;
        writeln!(f, "Columns: {}", self.columns)?;
        write!(f, "Records: {}", self.record_count)
    }
}
