//! System Catalog for PrimDB
//!
//! Maps table names to their schemas. The whole catalog is persisted after
//! every successful change, so it serializes as a plain
//! `{table: [[name, type], ...]}` object.

use super::schema::{Column, Schema};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// System Catalog - table name to schema, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: IndexMap<String, Schema>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table from `name:type` column specs.
    ///
    /// Nothing is changed unless every spec is valid.
    pub fn create_table<S: AsRef<str>>(
        &mut self,
        name: &str,
        column_specs: &[S],
    ) -> Result<&Schema> {
        if self.tables.contains_key(name) {
            return Err(Error::DuplicateTable(name.to_string()));
        }

        let columns = column_specs
            .iter()
            .map(|spec| Column::parse_spec(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let schema = Schema::with_user_columns(columns)?;
        debug!(table = name, schema = %schema, "table registered");

        let entry: &Schema = self.tables.entry(name.to_string()).or_insert(schema);
        Ok(entry)
    }

    /// Get a table's schema by name
    pub fn get_table(&self, name: &str) -> Result<&Schema> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Drop a table
    pub fn drop_table(&mut self, name: &str) -> Result<Schema> {
        // shift_remove keeps the remaining tables in creation order
        self.tables
            .shift_remove(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// List all table names in creation order
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
