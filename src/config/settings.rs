//! User settings for snapkeep
//!
//! Manages the defaults applied when a flag is not given on the command line:
//! retention count, exclusion patterns, and the clock used for archive names.

use serde::{Deserialize, Serialize};

use super::paths::SnapPaths;
use crate::backup::exclusion::{ExclusionPolicy, DEFAULT_EXCLUDE_PATTERNS};
use crate::backup::naming::ClockSource;
use crate::error::SnapError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Number of archives to keep after pruning
    #[serde(default = "default_keep")]
    pub keep: usize,

    /// Only prune archives produced from the same source name
    #[serde(default)]
    pub only_source: bool,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            keep: default_keep(),
            only_source: false,
        }
    }
}

/// Exclusion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionSettings {
    /// Substring patterns; any entry whose path contains one is skipped
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for ExclusionSettings {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

/// User settings for snapkeep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Retention policy
    #[serde(default)]
    pub retention: RetentionSettings,

    /// Exclusion policy
    #[serde(default)]
    pub exclusion: ExclusionSettings,

    /// Clock used to timestamp archive names
    #[serde(default)]
    pub clock: ClockSource,
}

fn default_schema_version() -> u32 {
    1
}

fn default_keep() -> usize {
    5
}

fn default_patterns() -> Vec<String> {
    DEFAULT_EXCLUDE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            retention: RetentionSettings::default(),
            exclusion: ExclusionSettings::default(),
            clock: ClockSource::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &SnapPaths) -> Result<Self, SnapError> {
        let settings: Settings = read_json(paths.settings_file())
            .map_err(|e| SnapError::Config(format!("Failed to load settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SnapPaths) -> Result<(), SnapError> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check that the stored exclusion patterns are usable
    pub fn validate(&self) -> Result<(), SnapError> {
        self.exclusion_policy().map(|_| ())
    }

    /// Build the exclusion policy described by these settings
    pub fn exclusion_policy(&self) -> Result<ExclusionPolicy, SnapError> {
        ExclusionPolicy::new(self.exclusion.patterns.iter().cloned())
    }
}
