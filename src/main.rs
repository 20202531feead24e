use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use snapkeep::cli::{
    handle_config_command, handle_create_command, handle_list_command, handle_prune_command,
    handle_run_command, ArchiveArgs, CommandOutcome, ListArgs, PruneArgs, RunArgs,
};
use snapkeep::config::{paths::SnapPaths, settings::Settings};
use snapkeep::SnapError;

#[derive(Parser)]
#[command(
    name = "snapkeep",
    author = "Kaylee Beyene",
    version,
    about = "Timestamped directory snapshots with count-based retention",
    long_about = "snapkeep creates a compressed, timestamped .tar.gz snapshot of a \
                  directory and keeps only the newest N snapshots in the backup \
                  directory. Run it from cron or a systemd timer; overlapping runs \
                  against the same backup directory are not supported."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding config.json
    #[arg(long, global = true, env = "SNAPKEEP_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a backup, then delete old backups beyond the retention count
    #[command(alias = "backup")]
    Run(RunArgs),

    /// Create a backup without pruning
    Create(ArchiveArgs),

    /// Delete old backups beyond the retention count
    Prune(PruneArgs),

    /// List backups in a directory, oldest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show current configuration and paths
    Config {
        /// Write the default settings file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(outcome) => {
            if let CommandOutcome::PruneFailures(count) = outcome {
                eprintln!("snapkeep: completed with {} prune failure(s)", count);
            }
            std::process::exit(outcome.exit_code());
        }
        Err(e) => {
            let path = e.downcast_ref::<SnapError>().and_then(SnapError::path);
            error!(path = ?path, "{:#}", e);
            eprintln!("snapkeep: {:#}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> Result<CommandOutcome> {
    let paths = match cli.config_dir {
        Some(dir) => SnapPaths::with_config_dir(dir),
        None => SnapPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let outcome = match cli.command {
        Commands::Run(args) => handle_run_command(&settings, args)?,
        Commands::Create(args) => handle_create_command(&settings, args)?,
        Commands::Prune(args) => handle_prune_command(&settings, args)?,
        Commands::List(args) => handle_list_command(args)?,
        Commands::Config { init } => handle_config_command(&paths, &settings, init)?,
    };

    Ok(outcome)
}

/// Log to stderr; `-v` flags win over `RUST_LOG`
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SnapError>()
        .map_or(1, SnapError::exit_code)
}
