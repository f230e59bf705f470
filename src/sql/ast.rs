//! Command AST for PrimDB
//!
//! One variant per shell command.

use super::clause::{SetClause, WhereClause};
use std::fmt;

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `create_table <name> <col:type> ...`
    CreateTable { table: String, columns: Vec<String> },
    /// `drop_table <name>`
    DropTable { table: String },
    /// `list_tables`
    ListTables,
    /// `insert into <table> values (...)`, values kept as raw text
    Insert { table: String, values: Vec<String> },
    /// `select from <table> [where ...]`
    Select {
        table: String,
        filter: Option<WhereClause>,
    },
    /// `update <table> set ... where ...`
    Update {
        table: String,
        assignments: SetClause,
        filter: WhereClause,
    },
    /// `delete from <table> where ...`
    Delete { table: String, filter: WhereClause },
    /// `info <table>`
    Info { table: String },
    /// `check <table>`
    Check { table: String },
    Help,
    Exit,
}

impl Command {
    /// Commands that throw data away and ask for confirmation first
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::DropTable { .. } | Command::Delete { .. })
    }

    /// Commands that change the catalog or a table's records
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::CreateTable { .. }
                | Command::DropTable { .. }
                | Command::Insert { .. }
                | Command::Update { .. }
                | Command::Delete { .. }
        )
    }

    /// Keyword the command was issued with
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTable { .. } => "create_table",
            Command::DropTable { .. } => "drop_table",
            Command::ListTables => "list_tables",
            Command::Insert { .. } => "insert",
            Command::Select { .. } => "select",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Info { .. } => "info",
            Command::Check { .. } => "check",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
