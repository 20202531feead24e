//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the snapshot engine.

pub mod config;
pub mod snapshot;

pub use config::handle_config_command;
pub use snapshot::{
    handle_create_command, handle_list_command, handle_prune_command, handle_run_command,
    ArchiveArgs, ListArgs, PruneArgs, RunArgs,
};

use crate::backup::PruneReport;

/// Exit status of a command that did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Pruning finished but this many deletions failed
    PruneFailures(usize),
}

impl CommandOutcome {
    /// Outcome of a command whose last step was a prune
    pub fn from_prune(report: &PruneReport) -> Self {
        if report.is_clean() {
            Self::Success
        } else {
            Self::PruneFailures(report.failures.len())
        }
    }

    /// Process exit status; partial prune failures share the delete error code
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::PruneFailures(_) => 14,
        }
    }
}
