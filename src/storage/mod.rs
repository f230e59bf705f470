//! Storage module
//!
//! This module contains the value and record types and the persistence
//! backends:
//! - JSON files on local disk
//! - In-memory maps (tests)

pub mod json;
pub mod memory;
pub mod record;
pub mod value;

pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use record::{next_id, record_id, Record};
pub use value::Value;

use crate::catalog::Catalog;
use crate::error::Result;

/// Persistence for the catalog and per-table record lists.
///
/// Both are always read and written whole.
pub trait Storage {
    /// Load the catalog, or an empty one if nothing was saved yet
    fn load_catalog(&self) -> Result<Catalog>;

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()>;

    /// Load a table's records, or an empty list if it was never written
    fn load_table(&self, table: &str) -> Result<Vec<Record>>;

    fn save_table(&mut self, table: &str, records: &[Record]) -> Result<()>;

    /// Forget a table's records. Missing data is not an error.
    fn remove_table(&mut self, table: &str) -> Result<()>;
}
