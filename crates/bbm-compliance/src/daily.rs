//! # Daily Evidence
//!
//! Per-day observations that complement the tier ratios: did the connection
//! reach a share of its advertised maximum at least once that day, and did
//! it drop below the guaranteed minimum at least once. Reported alongside
//! the verdict; never part of the outcome.

use bbm_analysis::group_by_day;
use bbm_core::{Direction, DirectionProfile, RecordSet};
use chrono::NaiveDate;
use serde::Serialize;

/// Observations for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEvidence {
    pub date: NaiveDate,
    pub measurements: usize,
    /// `None` when the profile declares no maximum.
    pub reached_maximum_share: Option<bool>,
    pub below_minimum: bool,
}

/// Daily observations for one direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionDailyEvidence {
    pub direction: Direction,
    /// `maximum_share × maximum_mbps`, when a maximum is declared.
    pub maximum_threshold_mbps: Option<f64>,
    pub days: Vec<DayEvidence>,
    pub days_reaching_maximum: Option<usize>,
    pub days_below_minimum: usize,
}

/// Daily evidence for `direction` over `records`.
///
/// `records` should already exclude values screened out for this direction.
pub fn daily_evidence(
    records: &RecordSet,
    direction: Direction,
    profile: &DirectionProfile,
    maximum_share: f64,
) -> DirectionDailyEvidence {
    let threshold = profile.maximum_mbps.map(|max| max * maximum_share);
    let days: Vec<DayEvidence> = group_by_day(records)
        .into_iter()
        .map(|(date, day)| {
            let speeds: Vec<f64> = day.iter().map(|r| direction.speed_of(r)).collect();
            DayEvidence {
                date,
                measurements: speeds.len(),
                reached_maximum_share: threshold.map(|t| speeds.iter().any(|&s| s >= t)),
                below_minimum: speeds.iter().any(|&s| s < profile.minimum_mbps),
            }
        })
        .collect();

    let days_reaching_maximum = threshold.map(|_| {
        days.iter()
            .filter(|d| d.reached_maximum_share == Some(true))
            .count()
    });
    let days_below_minimum = days.iter().filter(|d| d.below_minimum).count();

    DirectionDailyEvidence {
        direction,
        maximum_threshold_mbps: threshold,
        days,
        days_reaching_maximum,
        days_below_minimum,
    }
}
