//! # Stats Subcommand
//!
//! Summary statistics for a selection of measurements.

use anyhow::Result;
use bbm_analysis::{compute, select_all, Statistics};
use bbm_core::{MeasuredAt, Metric};
use bbm_store::RecordStore;
use clap::Args;

use crate::config::Settings;
use crate::ingest::{load_directory, LoadIssues};
use crate::output::{render_stats, OutputFormat};
use crate::selection::{local_now, SelectionArgs};

/// Arguments for the `bbm stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Metric to summarize (download, upload, latency/ping). Repeatable;
    /// defaults to all.
    #[arg(long = "metric", value_name = "METRIC")]
    pub metrics: Vec<Metric>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Statistics for the selected records.
#[derive(Debug, Clone)]
pub struct StatsReport {
    /// Number of records after selection.
    pub selected: usize,
    pub statistics: Statistics,
    /// Rejected files and skipped rows of the directory load.
    pub issues: LoadIssues,
}

/// Load the measurement directory and compute statistics.
///
/// # Errors
///
/// Fails if the directory cannot be listed or a selection flag is invalid.
pub fn compute_stats(
    args: &StatsArgs,
    settings: &Settings,
    store: &RecordStore,
    now: MeasuredAt,
) -> Result<StatsReport> {
    let (report, _) = load_directory(&settings.data.measurements_path, store)?;
    let subset = select_all(&store.all(), &args.selection.selections(now)?);
    let metrics: &[Metric] = if args.metrics.is_empty() {
        Metric::all()
    } else {
        &args.metrics
    };
    Ok(StatsReport {
        selected: subset.len(),
        statistics: compute(&subset, metrics),
        issues: LoadIssues::from_report(&report),
    })
}

/// Execute the stats subcommand.
///
/// Returns exit code 0.
pub fn run_stats(args: &StatsArgs, settings: &Settings, store: &RecordStore) -> Result<u8> {
    let report = compute_stats(args, settings, store, local_now())?;
    println!(
        "{}",
        render_stats(report.selected, &report.statistics, &report.issues, args.format)?
    );
    Ok(0)
}
