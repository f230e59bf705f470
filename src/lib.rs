//! PrimDB - a primitive file-backed table store
//!
//! This library provides the pieces behind the `primdb` shell:
//! - Table catalog with typed columns
//! - Value coercion and JSON persistence
//! - Command and WHERE/SET clause parsing
//! - Record engine (insert, select, update, delete)

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
