//! Command execution for PrimDB
//!
//! [`Database`] owns the catalog, the storage backend and the select cache,
//! and runs one [`Command`] at a time. Table records are loaded from storage
//! for every command and written back only after a successful change.

use std::time::Duration;

use tracing::{info, warn};

use super::cache::{CacheKey, QueryCache};
use super::records::{self, TableSummary};
use crate::catalog::{Catalog, Schema, ID_COLUMN};
use crate::error::{Error, Result};
use crate::sql::{Command, SetClause, WhereClause};
use crate::storage::{next_id, Record, Storage, Value};

/// Command result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names, for results with rows
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Record>,
    /// Number of affected rows (insert/update/delete)
    pub affected_rows: usize,
    /// IDs of affected rows, in table order
    pub affected_ids: Vec<i64>,
    /// Message
    pub message: Option<String>,
    /// How long the command took, when timing is reported
    pub elapsed: Option<Duration>,
}

impl QueryResult {
    /// Create a new empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a result with a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Create a result with rows
    pub fn with_rows(schema: &Schema, rows: Vec<Record>) -> Self {
        Self {
            columns: schema.column_names().into_iter().map(String::from).collect(),
            rows,
            ..Self::default()
        }
    }

    /// Create a result for a mutation
    pub fn with_affected(ids: Vec<i64>, count: usize, message: impl Into<String>) -> Self {
        Self {
            affected_rows: count,
            affected_ids: ids,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Render IDs as `1, 2, 5`
fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

/// Single-user database over a storage backend
pub struct Database<S: Storage> {
    catalog: Catalog,
    storage: S,
    cache: QueryCache,
}

impl<S: Storage> Database<S> {
    /// Open a database, loading the catalog from `storage`
    pub fn open(storage: S, cache_selects: bool) -> Result<Self> {
        let catalog = storage.load_catalog()?;
        info!(tables = catalog.list_tables().len(), "catalog loaded");
        Ok(Self {
            catalog,
            storage,
            cache: QueryCache::new(cache_selects),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Execute one command
    pub fn execute(&mut self, command: Command) -> Result<QueryResult> {
        let mutation = command.is_mutation();
        let result = match command {
            Command::CreateTable { table, columns } => self.create_table(&table, &columns),
            Command::DropTable { table } => self.drop_table(&table),
            Command::ListTables => Ok(self.list_tables()),
            Command::Insert { table, values } => self.insert(&table, &values),
            Command::Select { table, filter } => self.select(&table, filter.as_ref()),
            Command::Update {
                table,
                assignments,
                filter,
            } => self.update(&table, &assignments, &filter),
            Command::Delete { table, filter } => self.delete(&table, &filter),
            Command::Info { table } => self
                .info(&table)
                .map(|summary| QueryResult::with_message(summary.to_string())),
            Command::Check { table } => self.check(&table),
            Command::Help | Command::Exit => Ok(QueryResult::empty()),
        };
        if mutation && result.is_ok() {
            self.cache.invalidate_all();
        }
        result
    }

    pub fn create_table<C: AsRef<str>>(
        &mut self,
        table: &str,
        columns: &[C],
    ) -> Result<QueryResult> {
        // Mutate a copy so a failed save leaves the live catalog untouched
        let mut catalog = self.catalog.clone();
        let schema = catalog.create_table(table, columns)?.to_string();
        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;

        info!(table, "table created");
        Ok(QueryResult::with_message(format!(
            "Table \"{}\" created with columns: {}",
            table, schema
        )))
    }

    pub fn drop_table(&mut self, table: &str) -> Result<QueryResult> {
        let mut catalog = self.catalog.clone();
        catalog.drop_table(table)?;
        self.storage.save_catalog(&catalog)?;
        self.catalog = catalog;
        self.storage.remove_table(table)?;

        info!(table, "table dropped");
        Ok(QueryResult::with_message(format!(
            "Table \"{}\" dropped.",
            table
        )))
    }

    pub fn list_tables(&self) -> QueryResult {
        let tables = self.catalog.list_tables();
        if tables.is_empty() {
            return QueryResult::with_message("No tables found.");
        }
        let listing = tables
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n");
        QueryResult::with_message(listing)
    }

    pub fn insert<V: AsRef<str>>(&mut self, table: &str, values: &[V]) -> Result<QueryResult> {
        let schema = self.catalog.get_table(table)?;
        let mut record = records::insert(schema, values)?;

        let mut rows = self.storage.load_table(table)?;
        let id = next_id(&rows);
        record.insert(ID_COLUMN.to_string(), Value::Int(id));
        rows.push(record);
        self.storage.save_table(table, &rows)?;

        info!(table, id, "record inserted");
        Ok(QueryResult::with_affected(
            vec![id],
            1,
            format!("Record with ID={} inserted into table \"{}\".", id, table),
        ))
    }

    pub fn select(&mut self, table: &str, filter: Option<&WhereClause>) -> Result<QueryResult> {
        let schema = self.catalog.get_table(table)?;
        if let Some(filter) = filter {
            check_columns(schema, filter)?;
        }

        let storage = &self.storage;
        let rows = self
            .cache
            .get_or_try_insert_with(CacheKey::new(table, filter), || {
                let rows = storage.load_table(table)?;
                Ok(records::select(&rows, filter))
            })?;
        Ok(QueryResult::with_rows(schema, rows))
    }

    pub fn update(
        &mut self,
        table: &str,
        assignments: &SetClause,
        filter: &WhereClause,
    ) -> Result<QueryResult> {
        let schema = self.catalog.get_table(table)?;
        check_columns(schema, filter)?;

        let mut rows = self.storage.load_table(table)?;
        let outcome = records::update(&mut rows, schema, assignments, filter)?;
        if outcome.count == 0 {
            return Ok(QueryResult::with_message("No records matched."));
        }
        self.storage.save_table(table, &rows)?;

        info!(table, count = outcome.count, "records updated");
        let message = format!(
            "Record(s) with ID={} updated in table \"{}\".",
            join_ids(&outcome.ids),
            table
        );
        Ok(QueryResult::with_affected(outcome.ids, outcome.count, message))
    }

    pub fn delete(&mut self, table: &str, filter: &WhereClause) -> Result<QueryResult> {
        let schema = self.catalog.get_table(table)?;
        check_columns(schema, filter)?;

        let mut rows = self.storage.load_table(table)?;
        let outcome = records::delete(&mut rows, filter);
        if outcome.count == 0 {
            return Ok(QueryResult::with_message("No records matched."));
        }
        self.storage.save_table(table, &rows)?;

        info!(table, count = outcome.count, "records deleted");
        let message = format!(
            "Record(s) with ID={} deleted from table \"{}\".",
            join_ids(&outcome.ids),
            table
        );
        Ok(QueryResult::with_affected(outcome.ids, outcome.count, message))
    }

    pub fn info(&self, table: &str) -> Result<TableSummary> {
        let schema = self.catalog.get_table(table)?;
        let rows = self.storage.load_table(table)?;
        Ok(records::describe(table, schema, &rows))
    }

    /// Validate every stored record of a table against its schema
    pub fn check(&self, table: &str) -> Result<QueryResult> {
        let schema = self.catalog.get_table(table)?;
        let rows = self.storage.load_table(table)?;

        let problems: Vec<String> = rows
            .iter()
            .filter_map(|record| {
                records::validate(record, schema).err().map(|e| {
                    let id = record
                        .get(ID_COLUMN)
                        .map_or_else(|| "?".to_string(), Value::to_string);
                    format!("ID={}: {}", id, e)
                })
            })
            .collect();

        if problems.is_empty() {
            return Ok(QueryResult::with_message(format!(
                "All {} record(s) in table \"{}\" are valid.",
                rows.len(),
                table
            )));
        }
        warn!(table, invalid = problems.len(), "records failed validation");
        Ok(QueryResult::with_message(format!(
            "{} of {} record(s) in table \"{}\" are invalid:\n{}",
            problems.len(),
            rows.len(),
            table,
            problems.join("\n")
        )))
    }
}

/// Every clause column must exist in the table
fn check_columns(schema: &Schema, clause: &WhereClause) -> Result<()> {
    match clause.keys().find(|column| !schema.has_column(column)) {
        Some(column) => Err(Error::UnknownColumn(column.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parse_command;
    use crate::storage::MemoryStorage;

    fn create_test_db() -> Database<MemoryStorage> {
        Database::open(MemoryStorage::new(), true).unwrap()
    }

    fn run(db: &mut Database<MemoryStorage>, line: &str) -> Result<QueryResult> {
        db.execute(parse_command(line).unwrap())
    }

    #[test]
    fn test_create_table() {
        let mut db = create_test_db();

        let result = run(&mut db, "create_table t1 name:str active:bool").unwrap();
        assert_eq!(
            result.message.unwrap(),
            "Table \"t1\" created with columns: ID:int, name:str, active:bool"
        );
        assert_eq!(db.storage().load_catalog().unwrap(), *db.catalog());

        let result = run(&mut db, "create_table t1 other:int");
        assert!(matches!(result, Err(Error::DuplicateTable(_))));
        assert_eq!(
            db.catalog().get_table("t1").unwrap().to_string(),
            "ID:int, name:str, active:bool"
        );
    }

    #[test]
    fn test_insert_assigns_ids() {
        let mut db = create_test_db();
        run(&mut db, "create_table t1 name:str active:bool").unwrap();

        let result = run(&mut db, "insert into t1 values (Alice, true)").unwrap();
        assert_eq!(result.affected_ids, vec![1]);
        let result = run(&mut db, "insert into t1 values (Bob, notabool)").unwrap();
        assert_eq!(result.affected_ids, vec![2]);

        let rows = run(&mut db, "select from t1").unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ID"], Value::Int(1));
        assert_eq!(rows[0]["name"], Value::from("Alice"));
        assert_eq!(rows[0]["active"], Value::Bool(true));
        assert_eq!(rows[1]["active"], Value::Bool(false));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut db = create_test_db();
        run(&mut db, "create_table t n:int").unwrap();
        for n in 1..=4 {
            run(&mut db, &format!("insert into t values ({})", n)).unwrap();
        }
        run(&mut db, "delete from t where ID = 3").unwrap();

        let result = run(&mut db, "insert into t values (5)").unwrap();
        assert_eq!(result.affected_ids, vec![5]);
    }

    #[test]
    fn test_select_reflects_mutations() {
        let mut db = create_test_db();
        run(&mut db, "create_table t name:str age:int").unwrap();
        run(&mut db, "insert into t values (Alice, 30)").unwrap();

        // Populate the cache, then mutate
        let count = |db: &mut Database<MemoryStorage>| {
            run(db, "select from t where age = 30").unwrap().rows.len()
        };
        assert_eq!(count(&mut db), 1);
        run(&mut db, "insert into t values (Bob, 30)").unwrap();
        assert_eq!(count(&mut db), 2);

        run(&mut db, "update t set age = 31 where name = Bob").unwrap();
        assert_eq!(count(&mut db), 1);
    }

    #[test]
    fn test_unknown_table_and_column() {
        let mut db = create_test_db();
        run(&mut db, "create_table t name:str").unwrap();

        for line in [
            "select from nope",
            "insert into nope values (1)",
            "delete from nope where ID = 1",
            "info nope",
            "drop_table nope",
        ] {
            assert!(
                matches!(run(&mut db, line), Err(Error::UnknownTable(_))),
                "{line}"
            );
        }

        let result = run(&mut db, "select from t where email = x");
        assert!(matches!(result, Err(Error::UnknownColumn(c)) if c == "email"));
        let result = run(&mut db, "update t set name = x where email = y");
        assert!(matches!(result, Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_failed_insert_writes_nothing() {
        let mut db = create_test_db();
        run(&mut db, "create_table t age:int").unwrap();

        assert!(matches!(
            run(&mut db, "insert into t values (abc)"),
            Err(Error::TypeConversion { .. })
        ));
        assert!(matches!(
            run(&mut db, "insert into t values (1, 2)"),
            Err(Error::ArityMismatch { .. })
        ));
        assert!(db.storage().load_table("t").unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_messages() {
        let mut db = create_test_db();
        run(&mut db, "create_table t name:str").unwrap();
        run(&mut db, "insert into t values (a)").unwrap();
        run(&mut db, "insert into t values (b)").unwrap();
        run(&mut db, "insert into t values (a)").unwrap();

        let result = run(&mut db, "update t set name = c where name = a").unwrap();
        assert_eq!(result.affected_rows, 2);
        assert_eq!(
            result.message.unwrap(),
            "Record(s) with ID=1, 3 updated in table \"t\"."
        );

        let result = run(&mut db, "delete from t where name = zzz").unwrap();
        assert_eq!(result.affected_rows, 0);
        assert_eq!(result.message.unwrap(), "No records matched.");

        let result = run(&mut db, "delete from t where name = b").unwrap();
        assert_eq!(result.affected_ids, vec![2]);
    }

    #[test]
    fn test_drop_table_removes_data() {
        let mut db = create_test_db();
        run(&mut db, "create_table t name:str").unwrap();
        run(&mut db, "insert into t values (a)").unwrap();
        run(&mut db, "drop_table t").unwrap();

        assert!(db.catalog().is_empty());
        assert!(db.storage().load_table("t").unwrap().is_empty());

        run(&mut db, "create_table t name:str").unwrap();
        let result = run(&mut db, "insert into t values (a)").unwrap();
        assert_eq!(result.affected_ids, vec![1]);
    }

    #[test]
    fn test_list_tables() {
        let mut db = create_test_db();
        assert_eq!(
            run(&mut db, "list_tables").unwrap().message.unwrap(),
            "No tables found."
        );

        run(&mut db, "create_table b x:int").unwrap();
        run(&mut db, "create_table a x:int").unwrap();
        assert_eq!(
            run(&mut db, "list_tables").unwrap().message.unwrap(),
            "- b\n- a"
        );
    }

    #[test]
    fn test_info_and_check() {
        let mut db = create_test_db();
        run(&mut db, "create_table t age:int").unwrap();
        run(&mut db, "insert into t values (30)").unwrap();

        let summary = db.info("t").unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.columns, "ID:int, age:int");

        let message = run(&mut db, "check t").unwrap().message.unwrap();
        assert!(message.starts_with("All 1 record(s)"));

        // A quoted value lands as a string in an int column
        run(&mut db, "insert into t values (\"5\")").unwrap();
        let message = run(&mut db, "check t").unwrap().message.unwrap();
        assert!(message.starts_with("1 of 2 record(s)"));
        assert!(message.contains("ID=2"));
    }
}
