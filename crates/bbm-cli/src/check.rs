//! # Check Subcommand
//!
//! Evaluates a campaign against the contracted speeds. The campaign is
//! either the flag-selected records or, with `--protocol`, a
//! protocol-shaped subset chosen automatically from them.
//!
//! Exit codes: 0 for `PASS`, 1 for `FAIL` or `INCONCLUSIVE` (including
//! "no protocol campaign found"), 2 for configuration or I/O errors.

use anyhow::{Context, Result};
use bbm_analysis::{select_all, select_protocol_campaign};
use bbm_compliance::{ComplianceVerdict, Evaluator};
use bbm_core::MeasuredAt;
use bbm_store::RecordStore;
use clap::Args;

use crate::config::{ContractSettings, DirectionSettings, Settings};
use crate::ingest::{load_directory, LoadIssues};
use crate::output::{render_load_issues, render_verdict, OutputFormat};
use crate::selection::{local_now, SelectionArgs};

/// Arguments for the `bbm check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Evaluate an automatically selected protocol campaign
    /// (3 days x 10 measurements with spacing rules).
    #[arg(long)]
    pub protocol: bool,

    /// Guaranteed minimum download speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub download_min: Option<f64>,
    /// Normally available download speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub download_normal: Option<f64>,
    /// Advertised maximum download speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub download_max: Option<f64>,
    /// Guaranteed minimum upload speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub upload_min: Option<f64>,
    /// Normally available upload speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub upload_normal: Option<f64>,
    /// Advertised maximum upload speed (Mbit/s).
    #[arg(long, value_name = "MBPS")]
    pub upload_max: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CheckArgs {
    fn contract_flags(&self) -> ContractSettings {
        ContractSettings {
            download: DirectionSettings {
                minimum_mbps: self.download_min,
                normal_mbps: self.download_normal,
                maximum_mbps: self.download_max,
            },
            upload: DirectionSettings {
                minimum_mbps: self.upload_min,
                normal_mbps: self.upload_normal,
                maximum_mbps: self.upload_max,
            },
        }
    }
}

/// Verdict for one directory, with the parse problems met while loading it.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// `None` when `--protocol` is set and no protocol campaign exists.
    pub verdict: Option<ComplianceVerdict>,
    pub issues: LoadIssues,
}

/// Load the measurement directory and evaluate the selected campaign.
///
/// # Errors
///
/// Fails on a missing or inconsistent contract, an invalid methodology, or
/// an unreadable measurement directory.
pub fn evaluate_directory(
    args: &CheckArgs,
    settings: &Settings,
    store: &RecordStore,
    now: MeasuredAt,
) -> Result<CheckReport> {
    let profile = settings.contract.overlay(args.contract_flags()).resolve()?;
    let evaluator =
        Evaluator::new(settings.methodology).context("invalid methodology in configuration")?;

    let (report, _) = load_directory(&settings.data.measurements_path, store)?;
    let issues = LoadIssues::from_report(&report);
    let selected = select_all(&store.all(), &args.selection.selections(now)?);

    let campaign = if args.protocol {
        match select_protocol_campaign(&selected, &evaluator.methodology().spacing) {
            Some(campaign) => campaign,
            None => {
                tracing::warn!(
                    candidates = selected.len(),
                    "no protocol-conformant campaign in the selected records"
                );
                return Ok(CheckReport {
                    verdict: None,
                    issues,
                });
            }
        }
    } else {
        selected
    };

    let verdict = evaluator
        .evaluate(&campaign, &profile)
        .context("invalid contract profile")?;
    Ok(CheckReport {
        verdict: Some(verdict),
        issues,
    })
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, settings: &Settings, store: &RecordStore) -> Result<u8> {
    let report = evaluate_directory(args, settings, store, local_now())?;
    match &report.verdict {
        Some(verdict) => {
            println!("{}", render_verdict(verdict, &report.issues, args.format)?);
            Ok(if verdict.outcome.is_pass() { 0 } else { 1 })
        }
        None => {
            let rules = &settings.methodology.spacing;
            println!(
                "No protocol campaign found: need {} day(s) x {} measurement(s) within {} days.",
                rules.days, rules.per_day, rules.max_span_days
            );
            if !report.issues.is_empty() {
                println!("{}", render_load_issues(&report.issues, args.format)?);
            }
            Ok(1)
        }
    }
}
