//! # Output Rendering
//!
//! Text and JSON renderings of ingest reports, statistics and verdicts.
//! JSON output is the serde form of the library types so every field is
//! reproduced verbatim; text output is a human summary.

use std::fmt::Write as _;

use anyhow::Result;
use bbm_analysis::{MetricSummary, Statistics};
use bbm_compliance::{ComplianceVerdict, DirectionVerdict, TierResult};
use bbm_core::Direction;
use bbm_ingest::{LoadReport, RowSkipped};
use bbm_store::IngestSummary;
use clap::ValueEnum;
use serde::Serialize;

use crate::ingest::LoadIssues;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FileView<'a> {
    name: &'a str,
    records: usize,
    warned_records: usize,
    skipped: &'a [RowSkipped],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct IngestView<'a> {
    files: Vec<FileView<'a>>,
    parsed_records: usize,
    skipped_rows: usize,
    rejected_files: usize,
    store: &'a IngestSummary,
    stored_records: usize,
}

fn ingest_view<'a>(report: &'a LoadReport, summary: &'a IngestSummary, stored: usize) -> IngestView<'a> {
    let files = report
        .files
        .iter()
        .map(|f| match &f.result {
            Ok(parsed) => FileView {
                name: &f.name,
                records: parsed.records.len(),
                warned_records: parsed.warned_records(),
                skipped: &parsed.skipped,
                error: None,
            },
            Err(e) => FileView {
                name: &f.name,
                records: 0,
                warned_records: 0,
                skipped: &[],
                error: Some(e.to_string()),
            },
        })
        .collect();
    IngestView {
        files,
        parsed_records: report.record_count(),
        skipped_rows: report.skipped_count(),
        rejected_files: report.rejected().count(),
        store: summary,
        stored_records: stored,
    }
}

/// Render the outcome of a directory ingest.
pub fn render_ingest(
    report: &LoadReport,
    summary: &IngestSummary,
    stored: usize,
    show_skipped: bool,
    format: OutputFormat,
) -> Result<String> {
    let view = ingest_view(report, summary, stored);
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = String::new();
    for file in &view.files {
        match &file.error {
            None => {
                writeln!(
                    out,
                    "OK    {}: {} record(s), {} skipped row(s)",
                    file.name,
                    file.records,
                    file.skipped.len()
                )?;
                if file.warned_records > 0 {
                    writeln!(
                        out,
                        "      WARNING: {} record(s) dated away from the file name",
                        file.warned_records
                    )?;
                }
                if show_skipped {
                    for row in file.skipped {
                        writeln!(out, "      {row}")?;
                    }
                }
            }
            Some(error) => writeln!(out, "FAIL  {}: {error}", file.name)?,
        }
    }
    write!(
        out,
        "\n{} file(s), {} rejected; {} record(s) parsed, {} row(s) skipped; \
         store: {} inserted, {} replaced, {} total",
        view.files.len(),
        view.rejected_files,
        view.parsed_records,
        view.skipped_rows,
        summary.inserted,
        summary.replaced,
        stored
    )?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct StatsView<'a> {
    records: usize,
    statistics: &'a Statistics,
    load_issues: &'a LoadIssues,
}

/// Render statistics over `records` selected records, followed by any
/// parse problems of the load they were computed from.
pub fn render_stats(
    records: usize,
    stats: &Statistics,
    issues: &LoadIssues,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        let view = StatsView {
            records,
            statistics: stats,
            load_issues: issues,
        };
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = String::new();
    writeln!(out, "Selected records: {records}")?;
    writeln!(
        out,
        "{:<10} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "metric", "count", "mean", "min", "max", "p50", "p90", "p95"
    )?;
    for (metric, s) in stats.iter() {
        writeln!(
            out,
            "{:<10} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
            metric.as_str(),
            s.count,
            num(s.mean),
            num(s.min),
            num(s.max),
            num(s.p50),
            num(s.p90),
            num(s.p95),
            metric.unit()
        )?;
    }
    write_load_issues(&mut out, issues)?;
    Ok(out.trim_end().to_string())
}

fn num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct VerdictView<'a> {
    #[serde(flatten)]
    verdict: &'a ComplianceVerdict,
    load_issues: &'a LoadIssues,
}

/// Render a compliance verdict together with the load's parse problems.
pub fn render_verdict(
    verdict: &ComplianceVerdict,
    issues: &LoadIssues,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        let view = VerdictView {
            verdict,
            load_issues: issues,
        };
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = String::new();
    let v = &verdict.validity;
    writeln!(out, "Compliance verdict: {}", verdict.outcome)?;
    writeln!(
        out,
        "Campaign: {} record(s), {} valid, {} day(s), {} excluded",
        v.total_records, v.valid_measurements, v.distinct_days, v.excluded_records
    )?;
    for flag in &v.flags {
        writeln!(out, "  ! {flag}")?;
    }

    for &direction in Direction::all() {
        write_direction(&mut out, verdict.direction(direction))?;
    }

    let latency = &verdict.latency;
    writeln!(out, "\nLatency (informational): {}", latency_line(&latency.summary))?;
    if !latency.excluded.is_empty() {
        writeln!(out, "  {} implausible value(s) excluded", latency.excluded.len())?;
    }

    for daily in &verdict.daily {
        let max = match (daily.days_reaching_maximum, daily.maximum_threshold_mbps) {
            (Some(days), Some(threshold)) => {
                format!("{days} day(s) reached {threshold:.2} Mbit/s")
            }
            _ => "no maximum declared".to_string(),
        };
        writeln!(
            out,
            "Daily evidence ({}): {} of {} day(s) below minimum; {max}",
            daily.direction,
            daily.days_below_minimum,
            daily.days.len()
        )?;
    }

    if !verdict.spacing_warnings.is_empty() {
        writeln!(out, "\nSpacing warnings:")?;
        for warning in &verdict.spacing_warnings {
            writeln!(out, "  {warning}")?;
        }
    }
    write_load_issues(&mut out, issues)?;
    Ok(out.trim_end().to_string())
}

// ---------------------------------------------------------------------------
// Load issues
// ---------------------------------------------------------------------------

/// Render parse problems on their own.
pub fn render_load_issues(issues: &LoadIssues, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(issues)?);
    }
    let mut out = String::new();
    write_load_issues(&mut out, issues)?;
    Ok(out.trim().to_string())
}

fn write_load_issues(out: &mut String, issues: &LoadIssues) -> std::fmt::Result {
    if issues.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "\nLoad issues: {} rejected file(s), {} skipped row(s)",
        issues.rejected_files.len(),
        issues.skipped_rows.len()
    )?;
    for rejected in &issues.rejected_files {
        writeln!(out, "  FAIL {}: {}", rejected.file, rejected.error)?;
    }
    for skipped in &issues.skipped_rows {
        writeln!(out, "  {} {}", skipped.file, skipped.row)?;
    }
    Ok(())
}

fn write_direction(out: &mut String, d: &DirectionVerdict) -> std::fmt::Result {
    writeln!(
        out,
        "\n{} (minimum {:.2} Mbit/s, normal {:.2} Mbit/s): {}",
        capitalize(d.direction.as_str()),
        d.minimum_mbps,
        d.normal_mbps,
        d.outcome
    )?;
    writeln!(out, "  tier 1: {}", tier_line(&d.tier1, d.valid_count))?;
    writeln!(out, "  tier 2: {}", tier_line(&d.tier2, d.valid_count))?;
    for exclusion in &d.excluded {
        writeln!(out, "  excluded {exclusion}")?;
    }
    Ok(())
}

fn tier_line(t: &TierResult, valid: usize) -> String {
    let ratio = t
        .ratio
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
    format!(
        ">= {:.2} Mbit/s in {}/{} = {} (required {:.1}%) {}",
        t.threshold_mbps,
        t.satisfied,
        valid,
        ratio,
        t.required_ratio * 100.0,
        if t.passed { "ok" } else { "not met" }
    )
}

fn latency_line(s: &MetricSummary) -> String {
    if s.count == 0 {
        return "no measurements".to_string();
    }
    format!(
        "n={} mean {} ms, p50 {} ms, p95 {} ms",
        s.count,
        num(s.mean),
        num(s.p50),
        num(s.p95)
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
