//! Archive naming
//!
//! Archives are named `<source name>_<YYYY-MM-DD_HH-MM-SS>.tar.gz`. The
//! timestamp has second precision, so two archives of the same source made
//! within one second get the same name; the archiver reports that as an
//! error instead of replacing the earlier archive.

use std::path::Path;

use chrono::{Local, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Extension shared by every archive
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// strftime format of the timestamp component
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Length of a formatted timestamp
const TIMESTAMP_LEN: usize = 19;

/// Which wall clock timestamps archive names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    /// Local time of the machine (default)
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

/// Source of "now" for archive names
pub trait Clock {
    /// Current instant, truncated to whole seconds
    fn now(&self) -> NaiveDateTime;
}

/// The system clock in local time or UTC
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    source: ClockSource,
}

impl SystemClock {
    pub fn new(source: ClockSource) -> Self {
        Self { source }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = match self.source {
            ClockSource::Local => Local::now().naive_local(),
            ClockSource::Utc => Utc::now().naive_utc(),
        };
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// A clock frozen at one instant, for deterministic names
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Format a timestamp the way it appears in archive names
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Build the archive file name for a source name and instant
pub fn archive_file_name(source_name: &str, timestamp: &NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        source_name,
        format_timestamp(timestamp),
        ARCHIVE_EXTENSION
    )
}

/// Check whether a file name is a pruning candidate
///
/// Any visible file ending in `.tar.gz` qualifies, whether or not its stem
/// follows the timestamp convention. Hidden files are skipped so staging
/// files are never pruned.
pub fn is_archive_name(name: &str) -> bool {
    !name.starts_with('.')
        && name
            .strip_suffix(ARCHIVE_EXTENSION)
            .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
}

/// Split a conventional archive name into source name and timestamp
pub fn parse_archive_name(name: &str) -> Option<(&str, NaiveDateTime)> {
    let stem = name.strip_suffix(ARCHIVE_EXTENSION)?.strip_suffix('.')?;
    if stem.len() < TIMESTAMP_LEN + 2 || !stem.is_char_boundary(stem.len() - TIMESTAMP_LEN) {
        return None;
    }

    let (head, stamp) = stem.split_at(stem.len() - TIMESTAMP_LEN);
    let source_name = head.strip_suffix('_')?;
    if source_name.is_empty() {
        return None;
    }

    let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some((source_name, timestamp))
}

/// Check whether an archive name was produced for the given source name
pub fn belongs_to_source(name: &str, source_name: &str) -> bool {
    parse_archive_name(name).is_some_and(|(parsed, _)| parsed == source_name)
}

/// The directory name used as the archive's top-level component
pub fn source_base_name(source: &Path) -> Option<String> {
    source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
}
