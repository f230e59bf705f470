//! Error types for PrimDB
//!
//! Every error aborts only the command that raised it; the shell reports it
//! and keeps reading input.

use thiserror::Error;

use crate::catalog::ColumnType;

/// The main error type for PrimDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Command Errors ==========
    #[error("Parse error: {0}")]
    Parse(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' already exists")]
    DuplicateTable(String),

    #[error("Catalog error: table '{0}' does not exist")]
    UnknownTable(String),

    #[error("Catalog error: invalid column spec '{0}', expected name:type with type one of int, str, bool")]
    MalformedColumnSpec(String),

    #[error("Catalog error: column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("Catalog error: invalid schema, {0}")]
    InvalidSchema(String),

    // ========== Record Errors ==========
    #[error("Record error: expected {expected} value(s), got {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Type error: cannot convert '{value}' to {target} for column '{column}'")]
    TypeConversion {
        column: String,
        value: String,
        target: ColumnType,
    },

    #[error("Record error: column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("Type error: column '{column}' expects a value of type {expected}")]
    TypeMismatch { column: String, expected: ColumnType },

    #[error("Record error: column '{0}' is missing")]
    MissingColumn(String),

    #[error("Record error: column '{0}' cannot be assigned")]
    ReadOnlyColumn(String),

    // ========== Storage Errors ==========
    #[error("Storage error: cannot decode '{path}': {reason}")]
    CorruptedFile { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ========== Internal Errors ==========
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for PrimDB operations
pub type Result<T> = std::result::Result<T, Error>;
