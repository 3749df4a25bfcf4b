//! # Verdict Types
//!
//! The serializable result of an evaluation. Everything a renderer needs to
//! reproduce the decision is carried here, including the methodology and
//! profile it was made against.

use std::fmt;

use bbm_analysis::{MetricSummary, SpacingWarning};
use bbm_core::{ContractProfile, Direction};
use serde::Serialize;

use crate::daily::DirectionDailyEvidence;
use crate::methodology::Methodology;
use crate::sanity::Exclusion;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a direction or of the whole campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Every gated check met.
    Pass,
    /// Enough evidence, and at least one tier not met.
    Fail,
    /// Not enough usable evidence to decide.
    Inconclusive,
}

impl Outcome {
    /// Upper-case label as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Inconclusive => "INCONCLUSIVE",
        }
    }

    /// Whether this is [`Outcome::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-direction results
// ---------------------------------------------------------------------------

/// One tier of one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierResult {
    /// Speed a measurement must reach (inclusive).
    pub threshold_mbps: f64,
    /// Share of valid measurements that must reach the threshold.
    pub required_ratio: f64,
    /// Valid measurements at or above the threshold.
    pub satisfied: usize,
    /// `satisfied / valid_count`; `None` when there are no valid measurements.
    pub ratio: Option<f64>,
    /// `ratio >= required_ratio`, within rounding tolerance.
    pub passed: bool,
}

/// Verdict for download or upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionVerdict {
    /// Download or upload.
    pub direction: Direction,
    /// Contracted minimum speed, the tier 1 threshold.
    pub minimum_mbps: f64,
    /// Contracted normal speed, the tier 2 threshold.
    pub normal_mbps: f64,
    /// Measurements not excluded for this direction.
    pub valid_count: usize,
    /// Share of measurements reaching the minimum speed.
    pub tier1: TierResult,
    /// Share of measurements reaching the normal speed.
    pub tier2: TierResult,
    /// `PASS` when both tiers pass; `INCONCLUSIVE` without valid measurements.
    pub outcome: Outcome,
    /// Speeds of this direction removed by sanity screening.
    pub excluded: Vec<Exclusion>,
}

// ---------------------------------------------------------------------------
// Campaign validity
// ---------------------------------------------------------------------------

/// An unmet campaign precondition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "flag", rename_all = "snake_case")]
pub enum ValidityFlag {
    /// Fewer valid measurements than `min_measurements`.
    InsufficientMeasurements { found: usize, required: usize },
    /// Valid measurements cover fewer days than `min_distinct_days`.
    InsufficientDaySpread { found: usize, required: usize },
    /// Excluded share above `max_excluded_fraction`.
    ExcessiveExclusions {
        excluded: usize,
        total: usize,
        max_fraction: f64,
    },
}

impl fmt::Display for ValidityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientMeasurements { found, required } => write!(
                f,
                "insufficient measurements: {found} valid, {required} required"
            ),
            Self::InsufficientDaySpread { found, required } => write!(
                f,
                "insufficient day spread: {found} distinct day(s), {required} required"
            ),
            Self::ExcessiveExclusions {
                excluded,
                total,
                max_fraction,
            } => write!(
                f,
                "excessive exclusions: {excluded} of {total} records excluded, at most {:.0}% allowed",
                max_fraction * 100.0
            ),
        }
    }
}

/// Campaign-level counts and unmet preconditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignValidity {
    /// Records handed to the evaluator.
    pub total_records: usize,
    /// Records with neither speed excluded.
    pub valid_measurements: usize,
    /// Distinct calendar days among valid measurements.
    pub distinct_days: usize,
    /// Records with at least one speed excluded.
    pub excluded_records: usize,
    /// Unmet preconditions; any flag makes the verdict inconclusive.
    pub flags: Vec<ValidityFlag>,
}

impl CampaignValidity {
    /// Whether every precondition holds.
    pub fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Latency summary. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyReport {
    /// Statistics over plausible latencies.
    pub summary: MetricSummary,
    /// Latencies removed by sanity screening.
    pub excluded: Vec<Exclusion>,
}

// ---------------------------------------------------------------------------
// ComplianceVerdict
// ---------------------------------------------------------------------------

/// Complete result of evaluating a campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceVerdict {
    /// Campaign outcome.
    pub outcome: Outcome,
    pub download: DirectionVerdict,
    pub upload: DirectionVerdict,
    pub validity: CampaignValidity,
    /// Reported, not gated.
    pub latency: LatencyReport,
    /// Per-day evidence, one entry per direction. Reported, not gated.
    pub daily: Vec<DirectionDailyEvidence>,
    /// Non-fatal spacing problems among the valid measurements.
    pub spacing_warnings: Vec<SpacingWarning>,
    /// Parameters the verdict was reached with.
    pub methodology: Methodology,
    /// Contract the verdict was reached against.
    pub profile: ContractProfile,
}

impl ComplianceVerdict {
    /// Verdict for one direction.
    pub fn direction(&self, direction: Direction) -> &DirectionVerdict {
        match direction {
            Direction::Download => &self.download,
            Direction::Upload => &self.upload,
        }
    }

    /// Daily evidence for one direction.
    pub fn daily_for(&self, direction: Direction) -> Option<&DirectionDailyEvidence> {
        self.daily.iter().find(|d| d.direction == direction)
    }
}

/// Combine validity and direction outcomes into the campaign outcome.
pub(crate) fn overall_outcome(validity: &CampaignValidity, directions: &[Outcome]) -> Outcome {
    if !validity.is_valid() || directions.contains(&Outcome::Inconclusive) {
        Outcome::Inconclusive
    } else if directions.iter().all(Outcome::is_pass) {
        Outcome::Pass
    } else {
        Outcome::Fail
    }
}
