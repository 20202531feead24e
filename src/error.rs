//! Custom error types for snapkeep
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every fatal condition of the archiver and
//! the pruner has its own variant so callers can tell them apart.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for snapkeep operations
#[derive(Error, Debug)]
pub enum SnapError {
    /// The source directory is missing, unreadable, or not a directory
    #[error("Source not found: {}: {reason}", path.display())]
    SourceNotFound { path: PathBuf, reason: String },

    /// The destination directory could not be created or is not a directory
    #[error("Destination unavailable: {}: {reason}", path.display())]
    DestinationUnavailable { path: PathBuf, reason: String },

    /// Walking, compressing or writing the archive failed
    #[error("Failed to write archive {}: {reason}", path.display())]
    ArchiveWrite { path: PathBuf, reason: String },

    /// The destination directory could not be enumerated
    #[error("Cannot list archives in {}: {reason}", path.display())]
    PruneList { path: PathBuf, reason: String },

    /// A single archive could not be deleted during pruning
    #[error("Failed to delete archive {}: {reason}", path.display())]
    PruneDelete { path: PathBuf, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the archive engine
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report rendering errors
    #[error("Export error: {0}")]
    Export(String),
}

/// Stable discriminant of a [`SnapError`], used for exit-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceNotFound,
    DestinationUnavailable,
    ArchiveWrite,
    PruneList,
    PruneDelete,
    Config,
    Io,
    Json,
    Validation,
    Export,
}

impl SnapError {
    /// Create a "source not found" error
    pub fn source_not_found(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::SourceNotFound {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create a "destination unavailable" error
    pub fn destination_unavailable(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::DestinationUnavailable {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create an archive write error
    pub fn archive_write(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::ArchiveWrite {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create a prune listing error
    pub fn prune_list(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::PruneList {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create a per-file prune deletion error
    pub fn prune_delete(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::PruneDelete {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::DestinationUnavailable { .. } => ErrorKind::DestinationUnavailable,
            Self::ArchiveWrite { .. } => ErrorKind::ArchiveWrite,
            Self::PruneList { .. } => ErrorKind::PruneList,
            Self::PruneDelete { .. } => ErrorKind::PruneDelete,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Export(_) => ErrorKind::Export,
        }
    }

    /// Process exit status the CLI uses for this error
    ///
    /// Clap reserves 2 for usage errors, so engine errors start at 10.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::SourceNotFound => 10,
            ErrorKind::DestinationUnavailable => 11,
            ErrorKind::ArchiveWrite => 12,
            ErrorKind::PruneList => 13,
            ErrorKind::PruneDelete => 14,
            _ => 1,
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceNotFound { path, .. }
            | Self::DestinationUnavailable { path, .. }
            | Self::ArchiveWrite { path, .. }
            | Self::PruneList { path, .. }
            | Self::PruneDelete { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Check if this is a "source not found" error
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SnapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SnapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for snapkeep operations
pub type SnapResult<T> = Result<T, SnapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SnapError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_source_not_found_error() {
        let err = SnapError::source_not_found("/no/such/dir", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Source not found: /no/such/dir: No such file or directory"
        );
        assert!(err.is_source_not_found());
        assert_eq!(err.path(), Some(Path::new("/no/such/dir")));
    }

    #[test]
    fn test_fatal_kinds_have_distinct_exit_codes() {
        let errors = [
            SnapError::source_not_found("a", "x"),
            SnapError::destination_unavailable("b", "x"),
            SnapError::archive_write("c", "x"),
            SnapError::prune_list("d", "x"),
            SnapError::prune_delete("e", "x"),
        ];

        let mut codes: Vec<i32> = errors.iter().map(SnapError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c != 0 && *c != 1 && *c != 2));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let snap_err: SnapError = io_err.into();
        assert!(matches!(snap_err, SnapError::Io(_)));
        assert_eq!(snap_err.exit_code(), 1);
    }
}
