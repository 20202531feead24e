//! Archive creation
//!
//! Walks a source directory and streams every entry that survives the
//! exclusion policy into a gzip-compressed tar file in the destination.
//! Entries are stored under `<source name>/...` so extracting the archive
//! recreates the original folder.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::catalog::ArchiveFile;
use super::exclusion::{to_archive_path, ExclusionPolicy};
use super::naming::{archive_file_name, source_base_name, Clock, SystemClock};
use crate::config::Settings;
use crate::error::{SnapError, SnapResult};
use crate::storage::StagedFile;

/// Result of a successful archive creation
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    /// The archive that was written
    pub archive: ArchiveFile,
    /// Canonical source directory
    pub source: PathBuf,
    /// Top-level directory name inside the archive
    pub source_name: String,
    /// Instant used in the archive name
    pub timestamp: NaiveDateTime,
    /// Entries written (directories, files and symlinks)
    pub entries_archived: usize,
    /// Entries skipped by the exclusion policy (subtrees count once)
    pub entries_excluded: usize,
}

#[derive(Debug, Default)]
struct WalkCounts {
    archived: usize,
    excluded: usize,
}

/// Creates compressed snapshots of a directory tree
pub struct Archiver {
    policy: ExclusionPolicy,
    clock: Box<dyn Clock>,
    compression: Compression,
}

impl Archiver {
    /// Create an archiver using the local system clock
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self {
            policy,
            clock: Box::new(SystemClock::new(Default::default())),
            compression: Compression::default(),
        }
    }

    /// Create an archiver from the exclusion and clock settings
    pub fn from_settings(settings: &Settings) -> SnapResult<Self> {
        Ok(Self::new(settings.exclusion_policy()?).with_clock(SystemClock::new(settings.clock)))
    }

    /// Replace the clock used for archive names
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set the gzip compression level (0-9)
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }

    /// Create an archive of `source` inside `destination`
    ///
    /// The source is validated before the destination is touched. The
    /// archive only appears under its final name once it is complete; a
    /// failure at any point leaves no file behind.
    pub fn create_archive(&self, source: &Path, destination: &Path) -> SnapResult<ArchiveReport> {
        let source = validate_source(source)?;
        let source_name = source_base_name(&source)
            .ok_or_else(|| SnapError::source_not_found(&source, "Source has no directory name"))?;

        let destination = prepare_destination(destination)?;
        if destination == source {
            return Err(SnapError::destination_unavailable(
                &destination,
                "Destination is the source directory",
            ));
        }

        let timestamp = self.clock.now();
        let final_path = destination.join(archive_file_name(&source_name, &timestamp));

        if final_path.exists() {
            return Err(SnapError::archive_write(
                &final_path,
                "An archive with this name already exists",
            ));
        }

        let mut staged = StagedFile::create(&final_path)
            .map_err(|e| SnapError::archive_write(&final_path, e))?;
        debug!(staging = %staged.staging_path().display(), "Writing archive");

        let counts = self
            .write_tree(&source, &source_name, &destination, staged.as_file_mut())
            .map_err(|e| SnapError::archive_write(&final_path, e))?;

        let path = staged
            .commit()
            .map_err(|e| SnapError::archive_write(&final_path, e))?;
        let archive =
            ArchiveFile::from_path(&path).map_err(|e| SnapError::archive_write(&path, e))?;

        info!(
            archive = %archive.path.display(),
            entries = counts.archived,
            excluded = counts.excluded,
            bytes = archive.size_bytes,
            "Archive created"
        );

        Ok(ArchiveReport {
            archive,
            source,
            source_name,
            timestamp,
            entries_archived: counts.archived,
            entries_excluded: counts.excluded,
        })
    }

    fn write_tree<W: Write>(
        &self,
        source: &Path,
        source_name: &str,
        destination: &Path,
        writer: W,
    ) -> io::Result<WalkCounts> {
        let encoder = GzEncoder::new(BufWriter::new(writer), self.compression);
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);

        let mut counts = WalkCounts::default();
        let mut walker = WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let file_type = entry.file_type();

            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let archive_path = Path::new(source_name).join(relative);
            let name = to_archive_path(&archive_path);

            if let Some(pattern) = self.policy.first_match(&name) {
                debug!(path = %name, pattern, "Excluded");
                counts.excluded += 1;
                if file_type.is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            if file_type.is_dir() {
                // Never archive our own output
                if entry.path() == destination {
                    debug!(path = %name, "Skipping destination directory");
                    walker.skip_current_dir();
                    continue;
                }
                builder.append_dir(&archive_path, entry.path())?;
            } else if file_type.is_file() || file_type.is_symlink() {
                builder.append_path_with_name(entry.path(), &archive_path)?;
            } else {
                debug!(path = %name, "Skipping special file");
                continue;
            }
            counts.archived += 1;
        }

        let encoder = builder.into_inner()?;
        let mut writer = encoder.finish()?;
        writer.flush()?;

        Ok(counts)
    }
}

/// Check that the source is an existing, listable directory
fn validate_source(source: &Path) -> SnapResult<PathBuf> {
    let metadata = fs::metadata(source).map_err(|e| SnapError::source_not_found(source, e))?;
    if !metadata.is_dir() {
        return Err(SnapError::source_not_found(source, "Not a directory"));
    }

    fs::read_dir(source).map_err(|e| SnapError::source_not_found(source, e))?;
    fs::canonicalize(source).map_err(|e| SnapError::source_not_found(source, e))
}

/// Create the destination directory if needed and resolve it
fn prepare_destination(destination: &Path) -> SnapResult<PathBuf> {
    if destination.exists() && !destination.is_dir() {
        return Err(SnapError::destination_unavailable(
            destination,
            "Not a directory",
        ));
    }

    fs::create_dir_all(destination)
        .map_err(|e| SnapError::destination_unavailable(destination, e))?;
    fs::canonicalize(destination).map_err(|e| SnapError::destination_unavailable(destination, e))
}
