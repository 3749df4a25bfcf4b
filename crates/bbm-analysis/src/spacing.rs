//! # Spacing Warnings
//!
//! Non-fatal checks of how measurements within a day are spaced, using the
//! same [`ProtocolRules`] as campaign selection. The gap after the
//! `pause_after`-th measurement is held to the midday pause only; every
//! other consecutive pair is held to the minimum spacing.

use bbm_core::RecordSet;
use chrono::NaiveDate;
use serde::Serialize;

use crate::protocol::ProtocolRules;
use crate::selector::group_by_day;

/// A spacing rule that a day's measurements do not meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpacingWarning {
    /// Two consecutive measurements closer than the minimum spacing.
    TooClose {
        date: NaiveDate,
        /// 1-based position of the earlier measurement within the day.
        position: usize,
        gap_seconds: i64,
        required_seconds: i64,
    },
    /// The midday pause is shorter than required.
    ShortMiddayPause {
        date: NaiveDate,
        gap_minutes: i64,
        required_minutes: i64,
    },
}

impl std::fmt::Display for SpacingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooClose {
                date,
                position,
                gap_seconds,
                required_seconds,
            } => write!(
                f,
                "{date}: measurements {position} and {} are {gap_seconds}s apart (required: {required_seconds}s)",
                position + 1
            ),
            Self::ShortMiddayPause {
                date,
                gap_minutes,
                required_minutes,
            } => write!(
                f,
                "{date}: midday pause is {gap_minutes} min (required: {required_minutes} min)"
            ),
        }
    }
}

/// Spacing problems in `records`, by day then position.
pub fn spacing_warnings(records: &RecordSet, rules: &ProtocolRules) -> Vec<SpacingWarning> {
    let mut warnings = Vec::new();
    for (date, day) in group_by_day(records) {
        for (idx, pair) in day.as_slice().windows(2).enumerate() {
            let gap = pair[1].timestamp.since(&pair[0].timestamp);
            if rules.pause_after > 0 && idx + 1 == rules.pause_after {
                if gap < rules.midday_pause() {
                    warnings.push(SpacingWarning::ShortMiddayPause {
                        date,
                        gap_minutes: gap.num_minutes(),
                        required_minutes: rules.midday_pause_minutes,
                    });
                }
            } else if gap < rules.min_spacing() {
                warnings.push(SpacingWarning::TooClose {
                    date,
                    position: idx + 1,
                    gap_seconds: gap.num_seconds(),
                    required_seconds: rules.min_spacing().num_seconds(),
                });
            }
        }
    }
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "measurement spacing warnings");
    }
    warnings
}
