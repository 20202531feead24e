//! Config CLI command

use crate::config::paths::SnapPaths;
use crate::config::settings::Settings;
use crate::error::SnapResult;

use super::CommandOutcome;

/// Show the settings in effect, or write the defaults with `init`
pub fn handle_config_command(
    paths: &SnapPaths,
    settings: &Settings,
    init: bool,
) -> SnapResult<CommandOutcome> {
    if init {
        if paths.is_initialized() {
            println!("Settings already exist: {}", paths.settings_file().display());
        } else {
            Settings::default().save(paths)?;
            println!("Wrote default settings: {}", paths.settings_file().display());
        }
        return Ok(CommandOutcome::Success);
    }

    println!("snapkeep Configuration");
    println!("======================");
    println!("Config directory: {}", paths.config_dir().display());
    println!(
        "Settings file:    {}{}",
        paths.settings_file().display(),
        if paths.is_initialized() { "" } else { " (not created, using defaults)" }
    );
    println!();
    println!("Settings:");
    println!("  Keep:             {}", settings.retention.keep);
    println!("  Only same source: {}", settings.retention.only_source);
    println!("  Clock:            {:?}", settings.clock);
    println!("  Exclude patterns: {}", settings.exclusion.patterns.join(", "));

    Ok(CommandOutcome::Success)
}
