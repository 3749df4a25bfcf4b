//! # Ingest Subcommand
//!
//! Scans the measurement directory, parses every export in parallel and
//! merges the results into a [`RecordStore`]. The `stats` and `check`
//! subcommands reuse [`load_directory`] so every invocation works on the
//! same freshly ingested data.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bbm_ingest::{is_measurement_file_name, load_paths, LoadReport, RowSkipped};
use bbm_store::{IngestSummary, RecordStore};
use clap::Args;
use serde::Serialize;

use crate::config::Settings;
use crate::output::{render_ingest, OutputFormat};

/// Arguments for the `bbm ingest` subcommand.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// List every skipped row with its line number and reason.
    #[arg(long)]
    pub show_skipped: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Measurement files found in `dir`, sorted by name.
///
/// # Errors
///
/// Fails if `dir` does not exist or cannot be listed.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("measurement directory not found: {}", dir.display());
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_measurement_file_name);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!(dir = %dir.display(), files = files.len(), "scanned measurement directory");
    Ok(files)
}

/// Parse every measurement file in `dir` and ingest it into `store`.
///
/// Files are merged in name order, so on duplicate keys the record from
/// the later file name wins.
///
/// # Errors
///
/// Fails only if the directory cannot be listed. Individual files that
/// cannot be read or parsed are reported in the returned [`LoadReport`].
pub fn load_directory(dir: &Path, store: &RecordStore) -> Result<(LoadReport, IngestSummary)> {
    let files = scan_directory(dir)?;
    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no measurement files found");
    }
    let report = load_paths(&files);
    let summary = store.ingest(report.parsed().flat_map(|p| p.records.iter().cloned()));
    Ok((report, summary))
}

/// A file rejected while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub file: String,
    pub error: String,
}

/// A row skipped while loading, with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub file: String,
    #[serde(flatten)]
    pub row: RowSkipped,
}

/// Parse problems of one directory load, reported next to the results
/// computed from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadIssues {
    pub rejected_files: Vec<RejectedFile>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl LoadIssues {
    /// Collect rejected files and skipped rows from a load report.
    pub fn from_report(report: &LoadReport) -> Self {
        let rejected_files = report
            .rejected()
            .map(|(file, error)| RejectedFile {
                file: file.to_string(),
                error: error.to_string(),
            })
            .collect();
        let skipped_rows = report
            .parsed()
            .flat_map(|parsed| {
                parsed.skipped.iter().map(|row| SkippedRow {
                    file: parsed.file_name.clone(),
                    row: row.clone(),
                })
            })
            .collect();
        Self {
            rejected_files,
            skipped_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rejected_files.is_empty() && self.skipped_rows.is_empty()
    }
}

/// Execute the ingest subcommand.
///
/// Returns exit code 0; rejected files are listed but do not fail the run.
pub fn run_ingest(args: &IngestArgs, settings: &Settings, store: &RecordStore) -> Result<u8> {
    let (report, summary) = load_directory(&settings.data.measurements_path, store)?;
    let rendered = render_ingest(&report, &summary, store.len(), args.show_skipped, args.format)?;
    println!("{rendered}");
    Ok(0)
}
