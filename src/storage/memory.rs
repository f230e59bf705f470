use std::collections::HashMap;

use super::{Record, Storage};
use crate::catalog::Catalog;
use crate::error::Result;

/// In-memory storage, nothing touches the disk
#[derive(Debug, Default)]
pub struct MemoryStorage {
    catalog: Catalog,
    tables: HashMap<String, Vec<Record>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load_catalog(&self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.catalog = catalog.clone();
        Ok(())
    }

    fn load_table(&self, table: &str) -> Result<Vec<Record>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    fn save_table(&mut self, table: &str, records: &[Record]) -> Result<()> {
        self.tables.insert(table.to_string(), records.to_vec());
        Ok(())
    }

    fn remove_table(&mut self, table: &str) -> Result<()> {
        self.tables.remove(table);
        Ok(())
    }
}
