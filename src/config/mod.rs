//! Configuration module for snapkeep
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution for the settings file
//! - User settings persistence (retention count, exclusions, clock)

pub mod paths;
pub mod settings;

pub use paths::SnapPaths;
pub use settings::Settings;
