//! Snapshot engine for snapkeep
//!
//! Creates timestamped, compressed archives of a directory and prunes a
//! destination directory down to a fixed number of archives.
//!
//! # Architecture
//!
//! - `Archiver`: walks the source, applies the `ExclusionPolicy`, and writes
//!   one `.tar.gz` per call through a staging file
//! - `Pruner`: lists archives oldest-first and deletes all but the newest N
//! - `Snapshotter`: runs the two in sequence
//!
//! # Archive Names
//!
//! `<source name>_<YYYY-MM-DD_HH-MM-SS>.tar.gz`, stamped with local time
//! unless the settings select UTC. Names are only unique to the second.
//!
//! # Pruning Candidates
//!
//! Every visible regular file ending in `.tar.gz` in the destination, or
//! only those named after one source when the pruner is scoped. Anything
//! else in the directory is never deleted.
//!
//! # Concurrency
//!
//! A destination must not be shared by overlapping runs. There is no
//! locking; two runs pruning the same directory may race.
//!
//! # Example
//!
//! ```rust,ignore
//! use snapkeep::backup::{Archiver, ExclusionPolicy, Pruner};
//!
//! let archiver = Archiver::new(ExclusionPolicy::default());
//! let report = archiver.create_archive(Path::new("project"), Path::new("backups"))?;
//! println!("Backup created: {}", report.archive.path.display());
//!
//! let pruned = Pruner::new().prune(Path::new("backups"), 5)?;
//! println!("{}", pruned.summary());
//! ```

pub mod archiver;
pub mod catalog;
pub mod exclusion;
pub mod naming;
pub mod pruner;
pub mod snapshot;

pub use archiver::{ArchiveReport, Archiver};
pub use catalog::{list_archives, ArchiveFile};
pub use exclusion::{ExclusionPolicy, DEFAULT_EXCLUDE_PATTERNS};
pub use naming::{Clock, ClockSource, FixedClock, SystemClock, ARCHIVE_EXTENSION};
pub use pruner::{prune, PruneFailure, PrunePlan, PruneReport, Pruner};
pub use snapshot::{RunReport, Snapshotter};
