//! Archive catalog
//!
//! Lists the archives present in a destination directory, oldest first.
//! Nothing is persisted between runs; the directory itself is the index.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::naming::{belongs_to_source, is_archive_name, parse_archive_name};
use crate::error::{SnapError, SnapResult};

/// Metadata about one archive file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveFile {
    /// Archive filename
    pub file_name: String,
    /// Full path to the archive
    pub path: PathBuf,
    /// Timestamp encoded in the name, if the name follows the convention
    pub timestamp: Option<NaiveDateTime>,
    /// Filesystem modification time
    pub modified: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

impl ArchiveFile {
    /// Read the descriptor of an archive on disk
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let timestamp = parse_archive_name(&file_name).map(|(_, ts)| ts);

        Ok(Self {
            file_name,
            path: path.to_path_buf(),
            timestamp,
            modified: DateTime::<Utc>::from(metadata.modified()?),
            size_bytes: metadata.len(),
        })
    }
}

/// List archives in `destination`, oldest first
///
/// Ordering is by modification time, then by file name so archives with
/// equal times always sort the same way. With `source_name` set, only
/// archives named after that source are returned.
pub fn list_archives(
    destination: &Path,
    source_name: Option<&str>,
) -> SnapResult<Vec<ArchiveFile>> {
    let entries = fs::read_dir(destination).map_err(|e| SnapError::prune_list(destination, e))?;

    let mut archives = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| SnapError::prune_list(destination, e))?;

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_archive_name(&file_name) {
            continue;
        }
        if let Some(source) = source_name {
            if !belongs_to_source(&file_name, source) {
                continue;
            }
        }

        match entry.file_type() {
            Ok(ft) if ft.is_file() => {}
            Ok(_) => {
                debug!(file = %file_name, "Skipping non-regular archive-named entry");
                continue;
            }
            Err(e) => {
                debug!(file = %file_name, error = %e, "Skipping unreadable entry");
                continue;
            }
        }

        match ArchiveFile::from_path(&entry.path()) {
            Ok(archive) => archives.push(archive),
            // Vanished between read_dir and stat
            Err(e) => debug!(file = %file_name, error = %e, "Skipping archive"),
        }
    }

    sort_oldest_first(&mut archives);
    Ok(archives)
}

/// Sort by modification time ascending, then file name
pub fn sort_oldest_first(archives: &mut [ArchiveFile]) {
    archives.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}
