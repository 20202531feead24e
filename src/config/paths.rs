//! Path management for snapkeep
//!
//! Resolves where the settings file lives. Archive sources and destinations
//! are always given explicitly by the caller and never resolved here.
//!
//! ## Path Resolution Order
//!
//! 1. `SNAPKEEP_CONFIG_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/snapkeep` or `~/.config/snapkeep`
//! 3. Windows: `%APPDATA%\snapkeep`

use std::path::PathBuf;

use crate::error::SnapError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "SNAPKEEP_CONFIG_DIR";

/// Manages the paths used by snapkeep
#[derive(Debug, Clone)]
pub struct SnapPaths {
    /// Directory holding config.json
    config_dir: PathBuf,
}

impl SnapPaths {
    /// Create a new SnapPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if neither the override variable nor a home
    /// directory is available.
    pub fn new() -> Result<Self, SnapError> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { config_dir })
    }

    /// Create SnapPaths with a custom config directory (useful for testing)
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory (~/.config/snapkeep/ or equivalent)
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), SnapError> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| SnapError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SnapError> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                SnapError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("snapkeep"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SnapError> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| SnapError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("snapkeep"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SnapPaths::with_config_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.config_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(CONFIG_DIR_ENV, temp_dir.path());

        let paths = SnapPaths::new().unwrap();
        assert_eq!(paths.config_dir(), temp_dir.path());

        env::remove_var(CONFIG_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SnapPaths::with_config_dir(temp_dir.path().join("nested").join("snapkeep"));

        paths.ensure_directories().unwrap();
        paths.ensure_directories().unwrap();

        assert!(paths.config_dir().is_dir());
    }
}
