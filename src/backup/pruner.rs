//! Retention pruning
//!
//! Keeps the `keep` most recently modified archives in a destination and
//! deletes the rest, oldest first. Deletions are independent: one failure is
//! recorded and the remaining deletions still run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{list_archives, ArchiveFile};
use crate::error::{SnapError, SnapResult};

/// What a prune would do, computed without deleting anything
#[derive(Debug, Clone, Serialize)]
pub struct PrunePlan {
    /// Archives scheduled for deletion, oldest first
    pub to_remove: Vec<ArchiveFile>,
    /// Archives that stay, oldest first
    pub to_keep: Vec<ArchiveFile>,
}

impl PrunePlan {
    /// Split an oldest-first listing into removals and survivors
    pub fn from_sorted(mut archives: Vec<ArchiveFile>, keep: usize) -> Self {
        let remove_count = archives.len().saturating_sub(keep);
        let to_keep = archives.split_off(remove_count);
        Self {
            to_remove: archives,
            to_keep,
        }
    }

    /// Check if nothing would be removed
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty()
    }
}

/// A deletion that did not succeed
#[derive(Debug, Clone, Serialize)]
pub struct PruneFailure {
    /// Archive that could not be removed
    pub path: PathBuf,
    /// Underlying cause
    pub reason: String,
}

impl PruneFailure {
    /// Convert into the corresponding error value
    pub fn to_error(&self) -> SnapError {
        SnapError::prune_delete(&self.path, &self.reason)
    }
}

/// Outcome of a prune
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
    /// Number of archives the prune was asked to keep
    pub keep: usize,
    /// Archives deleted, oldest first
    pub removed: Vec<ArchiveFile>,
    /// Archives left in place, oldest first
    pub retained: Vec<ArchiveFile>,
    /// Deletions that failed
    pub failures: Vec<PruneFailure>,
}

impl PruneReport {
    /// Check if every scheduled deletion succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line description for operators
    pub fn summary(&self) -> String {
        let base = format!(
            "Removed {} archive(s), kept {}",
            self.removed.len(),
            self.retained.len()
        );
        if self.is_clean() {
            base
        } else {
            format!("{} with {} failure(s)", base, self.failures.len())
        }
    }
}

/// Enforces a count-based retention policy on a destination directory
#[derive(Debug, Clone, Default)]
pub struct Pruner {
    /// Restrict pruning to archives of one source
    source_name: Option<String>,
}

impl Pruner {
    /// Create a pruner considering every archive in the destination
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pruner that only considers archives of `source_name`
    pub fn for_source(source_name: impl Into<String>) -> Self {
        Self {
            source_name: Some(source_name.into()),
        }
    }

    /// Source name this pruner is restricted to, if any
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Compute which archives a prune would remove
    pub fn plan(&self, destination: &Path, keep: usize) -> SnapResult<PrunePlan> {
        let archives = list_archives(destination, self.source_name())?;
        Ok(PrunePlan::from_sorted(archives, keep))
    }

    /// Delete all but the `keep` newest archives
    ///
    /// Fails only if the destination cannot be listed. Per-file deletion
    /// failures are collected in the report.
    pub fn prune(&self, destination: &Path, keep: usize) -> SnapResult<PruneReport> {
        let plan = self.plan(destination, keep)?;
        Ok(self.execute(plan, keep))
    }

    /// Carry out a previously computed plan
    pub fn execute(&self, plan: PrunePlan, keep: usize) -> PruneReport {
        let mut report = PruneReport {
            keep,
            retained: plan.to_keep,
            ..Default::default()
        };

        for archive in plan.to_remove {
            match fs::remove_file(&archive.path) {
                Ok(()) => {
                    info!(archive = %archive.path.display(), "Deleted old archive");
                    report.removed.push(archive);
                }
                Err(e) => {
                    warn!(
                        archive = %archive.path.display(),
                        error = %e,
                        "Failed to delete archive"
                    );
                    report.failures.push(PruneFailure {
                        path: archive.path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

/// Prune `destination` down to `keep` archives, considering every archive
pub fn prune(destination: &Path, keep: usize) -> SnapResult<PruneReport> {
    Pruner::new().prune(destination, keep)
}
