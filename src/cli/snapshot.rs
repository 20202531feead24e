//! Snapshot CLI commands
//!
//! Implements `run`, `create`, `prune` and `list`.

use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use super::CommandOutcome;
use crate::backup::{
    list_archives, Archiver, ClockSource, ExclusionPolicy, Pruner, Snapshotter, SystemClock,
};
use crate::config::settings::Settings;
use crate::display::{
    format_archive_list, format_archive_report, format_prune_plan, format_prune_report,
};
use crate::error::SnapResult;
use crate::export::{write_report, ReportFormat};

/// Arguments shared by commands that create an archive
#[derive(Args, Debug, Clone)]
pub struct ArchiveArgs {
    /// Directory to back up
    #[arg(short, long)]
    pub source: PathBuf,

    /// Where to save the backup (created if missing)
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Extra exclusion pattern, matched as a substring of each path
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Ignore the exclusion patterns from the settings file
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Timestamp the archive name in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// gzip compression level
    #[arg(long, value_name = "0-9", value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

impl ArchiveArgs {
    /// Build an archiver from the settings with these flags applied
    pub fn archiver(&self, settings: &Settings) -> SnapResult<Archiver> {
        let mut policy = if self.no_default_excludes {
            ExclusionPolicy::empty()
        } else {
            settings.exclusion_policy()?
        };
        for pattern in &self.exclude {
            policy.push(pattern.clone())?;
        }
        debug!(patterns = ?policy.patterns(), "Exclusion policy");

        let clock = if self.utc {
            ClockSource::Utc
        } else {
            settings.clock
        };

        let mut archiver = Archiver::new(policy).with_clock(SystemClock::new(clock));
        if let Some(level) = self.compression {
            archiver = archiver.with_compression_level(level);
        }
        Ok(archiver)
    }
}

/// Arguments of `run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub archive: ArchiveArgs,

    /// Number of backups to keep (defaults to the settings value, 5)
    #[arg(short, long)]
    pub keep: Option<usize>,

    /// Only prune archives of this source
    #[arg(long)]
    pub only_source: bool,
}

/// Arguments of `prune`
#[derive(Args, Debug, Clone)]
pub struct PruneArgs {
    /// Backup directory to prune
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Number of backups to keep (defaults to the settings value, 5)
    #[arg(short, long)]
    pub keep: Option<usize>,

    /// Only consider archives of this source name
    #[arg(long, value_name = "NAME")]
    pub source_name: Option<String>,

    /// Show what would be deleted without deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments of `list`
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Backup directory to list
    #[arg(short, long)]
    pub destination: PathBuf,

    /// Only list archives of this source name
    #[arg(long, value_name = "NAME")]
    pub source_name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Create an archive, then prune the destination
pub fn handle_run_command(settings: &Settings, args: RunArgs) -> SnapResult<CommandOutcome> {
    let keep = args.keep.unwrap_or(settings.retention.keep);
    let only_source = args.only_source || settings.retention.only_source;

    let snapshotter =
        Snapshotter::new(args.archive.archiver(settings)?, keep).only_source(only_source);
    let report = snapshotter.run(&args.archive.source, &args.archive.destination)?;

    if !write_report(&report, args.archive.format, &mut io::stdout().lock())? {
        println!("{}", format_archive_report(&report.archive));
        println!("{}", format_prune_report(&report.prune));
    }

    Ok(CommandOutcome::from_prune(&report.prune))
}

/// Create an archive without pruning
pub fn handle_create_command(settings: &Settings, args: ArchiveArgs) -> SnapResult<CommandOutcome> {
    let report = args
        .archiver(settings)?
        .create_archive(&args.source, &args.destination)?;

    if !write_report(&report, args.format, &mut io::stdout().lock())? {
        println!("{}", format_archive_report(&report));
    }

    Ok(CommandOutcome::Success)
}

/// Prune a destination, or show the plan with `--dry-run`
pub fn handle_prune_command(settings: &Settings, args: PruneArgs) -> SnapResult<CommandOutcome> {
    let keep = args.keep.unwrap_or(settings.retention.keep);
    let pruner = match args.source_name {
        Some(name) => Pruner::for_source(name),
        None => Pruner::new(),
    };

    if args.dry_run {
        let plan = pruner.plan(&args.destination, keep)?;
        if !write_report(&plan, args.format, &mut io::stdout().lock())? {
            println!("{}", format_prune_plan(&plan, keep));
        }
        return Ok(CommandOutcome::Success);
    }

    let report = pruner.prune(&args.destination, keep)?;
    if !write_report(&report, args.format, &mut io::stdout().lock())? {
        println!("{}", format_prune_report(&report));
    }

    Ok(CommandOutcome::from_prune(&report))
}

/// List archives in a destination, oldest first
pub fn handle_list_command(args: ListArgs) -> SnapResult<CommandOutcome> {
    let archives = list_archives(&args.destination, args.source_name.as_deref())?;

    if !write_report(&archives, args.format, &mut io::stdout().lock())? {
        println!("{}", format_archive_list(&archives, chrono::Utc::now()));
    }

    Ok(CommandOutcome::Success)
}
