//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave half-written files under
//! their final name: JSON settings are written to a temp file and renamed,
//! archives are streamed into a hidden staging file and committed on success.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::SnapError;

/// Suffix of in-progress archive files
pub const STAGING_SUFFIX: &str = ".partial";

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, SnapError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| SnapError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| SnapError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SnapError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SnapError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| SnapError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| SnapError::Json(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| SnapError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| SnapError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SnapError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// A file being written under a hidden staging name
///
/// The staging file is `.<final name>.<random>.partial` in the same directory
/// as the final path. Dropping a `StagedFile` without calling
/// [`StagedFile::commit`] deletes the staging file, so an aborted write
/// never leaves anything behind.
pub struct StagedFile {
    temp: NamedTempFile,
    final_path: PathBuf,
}

impl StagedFile {
    /// Create a staging file for `final_path` in its parent directory
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let dir = final_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dir)?;

        Ok(Self {
            temp,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Path of the staging file
    pub fn staging_path(&self) -> &Path {
        self.temp.path()
    }

    /// Borrow the underlying file for writing
    pub fn as_file_mut(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    /// Sync the staged contents and move them to the final name
    ///
    /// Fails with `AlreadyExists` instead of replacing a file that is
    /// already present at the final path.
    pub fn commit(self) -> io::Result<PathBuf> {
        self.temp.as_file().sync_all()?;
        let final_path = self.final_path;
        self.temp
            .persist_noclobber(&final_path)
            .map_err(|e| e.error)?;
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        let temp_path = temp_dir.path().join("test.json.tmp");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();

        assert!(path.exists());
        assert!(!temp_path.exists());
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_staged_file_commit() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("out.tar.gz");

        let mut staged = StagedFile::create(&final_path).unwrap();
        let staging_path = staged.staging_path().to_path_buf();
        let staging_name = staging_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(staging_name.starts_with(".out.tar.gz."));
        assert!(staging_name.ends_with(STAGING_SUFFIX));

        staged.as_file_mut().write_all(b"payload").unwrap();
        let committed = staged.commit().unwrap();

        assert_eq!(committed, final_path);
        assert_eq!(fs::read(&final_path).unwrap(), b"payload");
        assert!(!staging_path.exists());
    }

    #[test]
    fn test_staged_file_dropped_leaves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("out.tar.gz");

        {
            let mut staged = StagedFile::create(&final_path).unwrap();
            staged.as_file_mut().write_all(b"half").unwrap();
        }

        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_file_does_not_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("out.tar.gz");
        fs::write(&final_path, b"original").unwrap();

        let mut staged = StagedFile::create(&final_path).unwrap();
        staged.as_file_mut().write_all(b"replacement").unwrap();
        let err = staged.commit().unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&final_path).unwrap(), b"original");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
