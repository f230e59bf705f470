//! Select result cache
//!
//! Memoizes `select` results per table and WHERE clause. Any mutating
//! command must call [`QueryCache::invalidate_all`] afterwards.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::sql::WhereClause;
use crate::storage::Record;

/// Cache key: table name plus the serialized clause (`*` for none)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    table: String,
    clause: String,
}

impl CacheKey {
    pub fn new(table: &str, clause: Option<&WhereClause>) -> Self {
        let clause = match clause {
            // Values serialize natively, so `1`, `true` and `"1"` stay distinct
            Some(clause) => {
                serde_json::to_string(clause).unwrap_or_else(|_| format!("{:?}", clause))
            }
            None => "*".to_string(),
        };
        Self {
            table: table.to_string(),
            clause,
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Vec<Record>>,
    enabled: bool,
}

impl QueryCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: HashMap::new(),
            enabled,
        }
    }

    /// Return the cached rows for `key`, computing and storing them on a miss.
    ///
    /// Errors from `compute` are returned and nothing is cached.
    pub fn get_or_try_insert_with<F>(
        &mut self,
        key: CacheKey,
        compute: F,
    ) -> Result<Vec<Record>>
    where
        F: FnOnce() -> Result<Vec<Record>>,
    {
        if !self.enabled {
            return compute();
        }
        if let Some(rows) = self.entries.get(&key) {
            debug!(table = %key.table, clause = %key.clause, "select cache hit");
            return Ok(rows.clone());
        }
        let rows = compute()?;
        self.entries.insert(key, rows.clone());
        Ok(rows)
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
