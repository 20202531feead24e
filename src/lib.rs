//! snapkeep - timestamped directory snapshots with count-based retention
//!
//! This library creates compressed `.tar.gz` snapshots of a directory tree
//! and prunes a backup directory down to a fixed number of snapshots. It is
//! meant to be run unattended from a scheduler that owns the timing.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `storage`: Atomic and staged file writes
//! - `backup`: Archive creation and retention pruning
//! - `display`: Terminal formatting
//! - `export`: JSON and YAML reports
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use snapkeep::backup::{Archiver, Snapshotter};
//! use snapkeep::config::{paths::SnapPaths, settings::Settings};
//!
//! let paths = SnapPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let archiver = Archiver::from_settings(&settings)?;
//! let snapshotter = Snapshotter::new(archiver, settings.retention.keep);
//! let report = snapshotter.run(Path::new("project"), Path::new("backups"))?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod storage;

pub use error::{SnapError, SnapResult};
