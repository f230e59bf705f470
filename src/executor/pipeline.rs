//! Command pipeline
//!
//! Wraps [`Database::execute`] with the steps that belong to the shell rather
//! than the engine: asking before destructive commands and timing every
//! command.

use std::time::Instant;

use tracing::{info, warn};

use super::database::{Database, QueryResult};
use crate::config::Config;
use crate::error::Result;
use crate::sql::Command;
use crate::storage::Storage;

/// Asks the user to approve a destructive command
pub trait Confirm {
    /// `true` to go ahead
    fn confirm(&mut self, action: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, action: &str) -> bool {
        self(action)
    }
}

/// Approves everything, for `--yes` and scripted use
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _action: &str) -> bool {
        true
    }
}

/// A database plus the confirmation and timing steps around each command
pub struct Session<S: Storage> {
    db: Database<S>,
    confirm_destructive: bool,
    report_timing: bool,
}

impl<S: Storage> Session<S> {
    pub fn new(db: Database<S>, config: &Config) -> Self {
        Self {
            db,
            confirm_destructive: config.confirm_destructive,
            report_timing: config.report_timing,
        }
    }

    pub fn database(&self) -> &Database<S> {
        &self.db
    }

    /// Run one command through the pipeline
    pub fn run(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<QueryResult> {
        let name = command.name();

        if self.confirm_destructive && command.is_destructive() && !confirm.confirm(name) {
            warn!(command = name, "cancelled by user");
            return Ok(QueryResult::with_message("Operation cancelled."));
        }

        let start = Instant::now();
        let result = self.db.execute(command);
        let elapsed = start.elapsed();
        info!(
            command = name,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            ok = result.is_ok(),
            "command finished"
        );

        let mut result = result?;
        if self.report_timing {
            result.elapsed = Some(elapsed);
        }
        Ok(result)
    }
}
