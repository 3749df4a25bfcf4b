//! # bbm CLI entry point
//!
//! Parses command-line arguments, installs logging, loads configuration
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bbm_cli::check::{run_check, CheckArgs};
use bbm_cli::config::Settings;
use bbm_cli::ingest::{run_ingest, IngestArgs};
use bbm_cli::stats::{run_stats, StatsArgs};
use bbm_cli::EXIT_ERROR;
use bbm_store::RecordStore;

/// Broadband measurement evaluation.
///
/// Ingests Breitbandmessung CSV exports, summarizes them, and checks a
/// measurement campaign against the contracted speeds.
#[derive(Parser, Debug)]
#[command(name = "bbm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to configuration file.
    #[arg(long, global = true, env = "BBM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the measurement exports (overrides the config).
    #[arg(long, global = true, env = "BBM_DATA_PATH")]
    data_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse all exports in the measurement directory and report results.
    Ingest(IngestArgs),

    /// Summary statistics for a selection of measurements.
    Stats(StatsArgs),

    /// Compliance verdict against the contracted speeds.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "bbm starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let working_dir = std::env::current_dir().context("cannot determine working directory")?;
    let settings = Settings::load(cli.config.as_deref(), &working_dir)?.with_data_path(cli.data_path);
    tracing::debug!(
        data = %settings.data.measurements_path.display(),
        "resolved measurement directory"
    );

    let store = RecordStore::new();
    match cli.command {
        Commands::Ingest(args) => run_ingest(&args, &settings, &store),
        Commands::Stats(args) => run_stats(&args, &settings, &store),
        Commands::Check(args) => run_check(&args, &settings, &store),
    }
}

/// Install the subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
