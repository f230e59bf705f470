//! Command execution module
//!
//! This module contains the record engine, the select cache, the database
//! dispatcher and the confirmation/timing pipeline around it.

pub mod cache;
pub mod database;
pub mod pipeline;
pub mod records;

pub use cache::{CacheKey, QueryCache};
pub use database::{Database, QueryResult};
pub use pipeline::{AlwaysConfirm, Confirm, Session};
pub use records::{MutationOutcome, TableSummary};
