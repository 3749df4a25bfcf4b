//! # Protocol Campaign Selection
//!
//! The regulator's measurement protocol asks for a fixed number of
//! measurements on a fixed number of calendar days, spread over a bounded
//! period, with minimum spacing between consecutive measurements and a
//! longer pause in the middle of each day.
//!
//! [`select_protocol_campaign`] searches a larger record set for a subset of
//! that shape. Day combinations are tried in lexicographic date order and
//! measurements within a day are picked greedily in time order, so the
//! result is deterministic: earliest feasible days, earliest feasible
//! measurements.

use std::collections::BTreeMap;

use bbm_core::{MeasurementRecord, RecordSet};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::selector::group_by_day;

/// Shape of a protocol campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolRules {
    /// Number of distinct measurement days.
    pub days: usize,
    /// Measurements per day.
    pub per_day: usize,
    /// Maximum calendar days between first and last measurement day.
    pub max_span_days: i64,
    /// Minimum calendar-day difference between consecutive measurement
    /// days. 2 leaves one free day in between.
    pub min_day_gap: i64,
    /// Minimum gap between consecutive measurements, in minutes.
    pub min_spacing_minutes: i64,
    /// Minimum gap after the `pause_after`-th measurement of a day, in
    /// minutes.
    pub midday_pause_minutes: i64,
    /// 1-based position of the measurement after which the midday pause
    /// applies.
    pub pause_after: usize,
}

impl Default for ProtocolRules {
    fn default() -> Self {
        Self {
            days: 3,
            per_day: 10,
            max_span_days: 14,
            min_day_gap: 2,
            min_spacing_minutes: 5,
            midday_pause_minutes: 180,
            pause_after: 5,
        }
    }
}

impl ProtocolRules {
    /// Total measurements in a campaign, saturating at `usize::MAX`.
    pub fn campaign_size(&self) -> usize {
        self.days.saturating_mul(self.per_day)
    }

    /// Minimum gap between consecutive measurements.
    pub fn min_spacing(&self) -> Duration {
        minutes_or_max(self.min_spacing_minutes)
    }

    /// Minimum gap around the midday pause.
    pub fn midday_pause(&self) -> Duration {
        minutes_or_max(self.midday_pause_minutes)
    }

    /// Required gap before picking the measurement at 0-based `position`.
    pub(crate) fn required_gap_before(&self, position: usize) -> Duration {
        if self.pause_after > 0 && position == self.pause_after {
            self.min_spacing().max(self.midday_pause())
        } else {
            self.min_spacing()
        }
    }

    fn days_compatible(&self, first: NaiveDate, previous: NaiveDate, next: NaiveDate) -> bool {
        (next - previous).num_days() >= self.min_day_gap
            && (next - first).num_days() <= self.max_span_days
    }
}

/// Out-of-range minute counts clamp to the largest representable gap, which
/// no pair of measurements can meet.
fn minutes_or_max(minutes: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or(Duration::MAX)
}

/// Find a protocol-shaped campaign within `records`.
///
/// Returns the chosen records in timestamp order, or `None` if no
/// combination of days satisfies the rules.
pub fn select_protocol_campaign(records: &RecordSet, rules: &ProtocolRules) -> Option<RecordSet> {
    if rules.days == 0 || rules.per_day == 0 || records.len() < rules.campaign_size() {
        return None;
    }

    let by_day = group_by_day(records);
    let candidates: Vec<(NaiveDate, Vec<MeasurementRecord>)> = by_day
        .into_iter()
        .filter_map(|(day, set)| pick_day(set.as_slice(), rules).map(|picked| (day, picked)))
        .collect();
    tracing::debug!(
        candidate_days = candidates.len(),
        required = rules.days,
        "searching protocol campaign"
    );

    let mut chosen = Vec::with_capacity(rules.days);
    if !search(&candidates, rules, 0, &mut chosen) {
        return None;
    }

    let campaign: RecordSet = chosen
        .iter()
        .flat_map(|&idx| candidates[idx].1.iter().cloned())
        .collect();
    let first = chosen.first().map(|&i| candidates[i].0);
    let last = chosen.last().map(|&i| candidates[i].0);
    tracing::info!(
        records = campaign.len(),
        first_day = ?first,
        last_day = ?last,
        "selected protocol campaign"
    );
    Some(campaign)
}

/// Depth-first search over candidate days in lexicographic order.
fn search(
    candidates: &[(NaiveDate, Vec<MeasurementRecord>)],
    rules: &ProtocolRules,
    start: usize,
    chosen: &mut Vec<usize>,
) -> bool {
    if chosen.len() == rules.days {
        return true;
    }
    for idx in start..candidates.len() {
        let day = candidates[idx].0;
        if let (Some(&first), Some(&previous)) = (chosen.first(), chosen.last()) {
            let first = candidates[first].0;
            let previous = candidates[previous].0;
            if (day - first).num_days() > rules.max_span_days {
                break;
            }
            if !rules.days_compatible(first, previous, day) {
                continue;
            }
        }
        chosen.push(idx);
        if search(candidates, rules, idx + 1, chosen) {
            return true;
        }
        chosen.pop();
    }
    false
}

/// Greedily pick `per_day` measurements of one day in time order.
fn pick_day(day: &[MeasurementRecord], rules: &ProtocolRules) -> Option<Vec<MeasurementRecord>> {
    let mut picked: Vec<MeasurementRecord> = Vec::with_capacity(rules.per_day);
    for record in day {
        let fits = match picked.last() {
            None => true,
            Some(last) => record.timestamp.since(&last.timestamp) >= rules.required_gap_before(picked.len()),
        };
        if fits {
            picked.push(record.clone());
            if picked.len() == rules.per_day {
                return Some(picked);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbm_core::{MeasuredAt, TestId};
    use chrono::NaiveDateTime;

    fn day_records(date: &str, times: &[&str]) -> Vec<MeasurementRecord> {
        times
            .iter()
            .map(|t| {
                let dt = NaiveDateTime::parse_from_str(&format!("{date} {t}"), "%Y-%m-%d %H:%M").unwrap();
                MeasurementRecord::new(
                    MeasuredAt::new(dt),
                    TestId::new(&format!("{date}-{t}")).unwrap(),
                    100.0,
                    20.0,
                    12,
                )
            })
            .collect()
    }

    const GOOD_DAY: [&str; 10] = [
        "08:00", "08:10", "08:20", "08:30", "08:40", "12:00", "12:10", "12:20", "12:30", "12:40",
    ];

    #[test]
    fn picks_three_spaced_days() {
        let mut all = Vec::new();
        for date in ["2024-07-01", "2024-07-03", "2024-07-05"] {
            all.extend(day_records(date, &GOOD_DAY));
        }
        let campaign = select_protocol_campaign(&RecordSet::from_records(all), &ProtocolRules::default()).unwrap();
        assert_eq!(campaign.len(), 30);
        assert_eq!(group_by_day(&campaign).len(), 3);
    }

    #[test]
    fn adjacent_days_are_skipped() {
        let mut all = Vec::new();
        for date in ["2024-07-01", "2024-07-02", "2024-07-04", "2024-07-06"] {
            all.extend(day_records(date, &GOOD_DAY));
        }
        let campaign = select_protocol_campaign(&RecordSet::from_records(all), &ProtocolRules::default()).unwrap();
        let days: Vec<NaiveDate> = group_by_day(&campaign).into_keys().collect();
        let expected: Vec<NaiveDate> = ["2024-07-01", "2024-07-04", "2024-07-06"]
            .iter()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap())
            .collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn span_over_limit_fails() {
        let mut all = Vec::new();
        for date in ["2024-07-01", "2024-07-08", "2024-07-20"] {
            all.extend(day_records(date, &GOOD_DAY));
        }
        assert!(select_protocol_campaign(&RecordSet::from_records(all), &ProtocolRules::default()).is_none());
    }

    #[test]
    fn greedy_skips_crowded_measurements() {
        let mut times = GOOD_DAY.to_vec();
        times.extend(["08:02", "08:04", "12:01"]);
        let picked = pick_day(
            RecordSet::from_records(day_records("2024-07-01", &times)).as_slice(),
            &ProtocolRules::default(),
        )
        .unwrap();
        let chosen: Vec<String> = picked.iter().map(|r| r.timestamp.as_datetime().format("%H:%M").to_string()).collect();
        assert_eq!(chosen, GOOD_DAY.to_vec());
    }

    #[test]
    fn midday_pause_is_required() {
        let times = [
            "08:00", "08:10", "08:20", "08:30", "08:40", "10:00", "10:10", "10:20", "10:30", "10:40",
        ];
        assert!(pick_day(&day_records("2024-07-01", &times), &ProtocolRules::default()).is_none());
    }

    #[test]
    fn too_few_records_short_circuits() {
        let all = day_records("2024-07-01", &GOOD_DAY);
        assert!(select_protocol_campaign(&RecordSet::from_records(all), &ProtocolRules::default()).is_none());
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        let rules: ProtocolRules = serde_json::from_str(r#"{"per_day": 4}"#).unwrap();
        assert_eq!(rules.per_day, 4);
        assert_eq!(rules.days, 3);
        assert_eq!(rules.campaign_size(), 12);
    }

    #[test]
    fn oversized_campaign_is_none() {
        let all = day_records("2024-07-01", &GOOD_DAY);
        let rules = ProtocolRules {
            days: usize::MAX,
            per_day: 2,
            ..ProtocolRules::default()
        };
        assert_eq!(rules.campaign_size(), usize::MAX);
        assert!(select_protocol_campaign(&RecordSet::from_records(all), &rules).is_none());
    }

    #[test]
    fn unrepresentable_spacing_clamps() {
        let rules = ProtocolRules {
            min_spacing_minutes: i64::MAX,
            ..ProtocolRules::default()
        };
        assert_eq!(rules.min_spacing(), Duration::MAX);
        assert!(pick_day(&day_records("2024-07-01", &GOOD_DAY), &rules).is_none());
    }
}
