//! JSON file storage for PrimDB
//!
//! The catalog lives in one metadata file in the data directory; every table
//! gets its own `tables/<table>.json` below it, so no table name can reach
//! the catalog file. Files are pretty-printed so they stay readable.

use super::{Record, Storage};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subdirectory of the data directory holding table files
pub const TABLES_DIR: &str = "tables";

/// JSON-on-disk storage rooted at a data directory
#[derive(Debug)]
pub struct JsonStorage {
    /// Directory where table files are stored
    tables_dir: PathBuf,
    /// Path of the catalog file
    metadata_path: PathBuf,
}

impl JsonStorage {
    /// Open storage in `data_dir`, creating the directories if needed.
    pub fn open(data_dir: impl AsRef<Path>, metadata_file: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let tables_dir = data_dir.join(TABLES_DIR);
        std::fs::create_dir_all(&tables_dir)?;
        Ok(Self {
            tables_dir,
            metadata_path: data_dir.join(metadata_file),
        })
    }

    /// Path of a table's data file
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.tables_dir.join(format!("{}.json", table))
    }
}

/// Read and decode a JSON file; `None` if it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| Error::CorruptedFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| Error::Internal(e.to_string()))?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), "file written");
    Ok(())
}

impl Storage for JsonStorage {
    fn load_catalog(&self) -> Result<Catalog> {
        Ok(read_json(&self.metadata_path)?.unwrap_or_default())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        write_json(&self.metadata_path, catalog)
    }

    fn load_table(&self, table: &str) -> Result<Vec<Record>> {
        Ok(read_json(&self.table_path(table))?.unwrap_or_default())
    }

    fn save_table(&mut self, table: &str, records: &[Record]) -> Result<()> {
        write_json(&self.table_path(table), records)
    }

    fn remove_table(&mut self, table: &str) -> Result<()> {
        match std::fs::remove_file(self.table_path(table)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
