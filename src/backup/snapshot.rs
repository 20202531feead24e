//! Create-then-prune runs
//!
//! A run archives the source and then prunes the destination. If archive
//! creation fails the destination is left alone.

use std::path::Path;

use serde::Serialize;

use super::archiver::{ArchiveReport, Archiver};
use super::pruner::{PruneReport, Pruner};
use crate::error::SnapResult;

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub archive: ArchiveReport,
    pub prune: PruneReport,
}

impl RunReport {
    /// Check if the run finished without any per-file prune failure
    pub fn is_clean(&self) -> bool {
        self.prune.is_clean()
    }
}

/// An archiver and a pruner applied to one destination in sequence
pub struct Snapshotter {
    archiver: Archiver,
    keep: usize,
    only_source: bool,
}

impl Snapshotter {
    /// Create a snapshotter keeping `keep` archives
    pub fn new(archiver: Archiver, keep: usize) -> Self {
        Self {
            archiver,
            keep,
            only_source: false,
        }
    }

    /// Only prune archives of the source being archived
    pub fn only_source(mut self, only_source: bool) -> Self {
        self.only_source = only_source;
        self
    }

    /// Archive `source` into `destination`, then prune `destination`
    pub fn run(&self, source: &Path, destination: &Path) -> SnapResult<RunReport> {
        let archive = self.archiver.create_archive(source, destination)?;

        let pruner = if self.only_source {
            Pruner::for_source(archive.source_name.as_str())
        } else {
            Pruner::new()
        };
        let prune = pruner.prune(destination, self.keep)?;

        Ok(RunReport { archive, prune })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::exclusion::ExclusionPolicy;
    use crate::backup::naming::FixedClock;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use filetime::{set_file_mtime, FileTime};
    use std::fs;
    use tempfile::TempDir;

    fn instant(offset: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + Duration::seconds(offset)
    }

    fn snapshotter(offset: i64, keep: usize) -> Snapshotter {
        let archiver =
            Archiver::new(ExclusionPolicy::default()).with_clock(FixedClock(instant(offset)));
        Snapshotter::new(archiver, keep)
    }

    #[test]
    fn test_run_creates_and_prunes() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("proj");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a.txt"), b"a").unwrap();
        let dest = temp.path().join("backups");

        for i in 0..3 {
            let report = snapshotter(i, 2).run(&src, &dest).unwrap();
            // created archives share the same mtime second; age them explicitly
            set_file_mtime(&report.archive.archive.path, FileTime::from_unix_time(1_000 + i, 0))
                .unwrap();
        }
        let report = snapshotter(3, 2).run(&src, &dest).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.prune.removed.len(), 1);
        assert_eq!(report.prune.removed[0].timestamp, Some(instant(1)));
        assert!(report.archive.archive.path.exists());
        assert!(report
            .prune
            .retained
            .iter()
            .any(|a| a.path == report.archive.archive.path));
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_create_skips_prune() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backups");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("old.tar.gz"), b"x").unwrap();

        let err = snapshotter(0, 0)
            .run(&temp.path().join("missing"), &dest)
            .unwrap_err();

        assert!(err.is_source_not_found());
        assert!(dest.join("old.tar.gz").exists());
    }

    #[test]
    fn test_only_source_leaves_other_archives() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("proj");
        fs::create_dir(&src).unwrap();
        let dest = temp.path().join("backups");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("other_2020-01-01_00-00-00.tar.gz"), b"x").unwrap();

        let report = snapshotter(0, 1).only_source(true).run(&src, &dest).unwrap();

        assert!(report.prune.removed.is_empty());
        assert!(dest.join("other_2020-01-01_00-00-00.tar.gz").exists());
    }
}
