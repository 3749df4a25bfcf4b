//! # Compliance Evaluator
//!
//! Applies a [`Methodology`] to a record set and contract profile and
//! produces a [`ComplianceVerdict`].
//!
//! ## Counting rules
//!
//! - A direction's denominator is every record whose speed in that
//!   direction passed sanity screening.
//! - The campaign's valid measurements are records with neither speed
//!   excluded; the minimum-count and day-spread preconditions use those.
//! - Thresholds are inclusive: a measurement exactly at the minimum counts
//!   toward tier 1.
//! - Latency exclusions only affect the latency report.

use std::collections::BTreeSet;

use bbm_analysis::{group_by_day, spacing_warnings, MetricSummary};
use bbm_core::{ContractProfile, Direction, DirectionProfile, RecordSet};

use crate::daily::daily_evidence;
use crate::error::ConfigError;
use crate::methodology::Methodology;
use crate::sanity::Exclusion;
use crate::verdict::{
    overall_outcome, CampaignValidity, ComplianceVerdict, DirectionVerdict, LatencyReport,
    Outcome, TierResult, ValidityFlag,
};

/// Absorbs rounding in `satisfied / valid_count` when comparing to a
/// required ratio such as 2/3.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Evaluator bound to a validated methodology.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    methodology: Methodology,
}

impl Evaluator {
    /// Create an evaluator.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the methodology is invalid.
    pub fn new(methodology: Methodology) -> Result<Self, ConfigError> {
        methodology.validate()?;
        Ok(Self { methodology })
    }

    /// The validated methodology this evaluator applies.
    pub fn methodology(&self) -> &Methodology {
        &self.methodology
    }

    /// Evaluate `records` against `profile`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the profile is inconsistent. Data problems never
    /// produce an error.
    pub fn evaluate(
        &self,
        records: &RecordSet,
        profile: &ContractProfile,
    ) -> Result<ComplianceVerdict, ConfigError> {
        validate_profile(profile)?;
        let m = &self.methodology;

        let download = self.screen(records, Direction::Download);
        let upload = self.screen(records, Direction::Upload);

        let excluded_keys: BTreeSet<_> = download
            .excluded
            .iter()
            .chain(upload.excluded.iter())
            .map(|e| e.key.clone())
            .collect();
        let valid = records.filter(|r| !excluded_keys.contains(&r.key()));
        let validity = self.validity(records.len(), &valid, excluded_keys.len());

        let download_verdict = self.direction_verdict(download, &profile.download);
        let upload_verdict = self.direction_verdict(upload, &profile.upload);
        let outcome = overall_outcome(
            &validity,
            &[download_verdict.outcome, upload_verdict.outcome],
        );

        let latency = self.latency_report(records);
        let daily = Direction::all()
            .iter()
            .map(|&d| {
                let screened = records.filter(|r| m.sanity.screen_speed(r, d).is_none());
                daily_evidence(&screened, d, profile.for_direction(d), m.maximum_share)
            })
            .collect();
        let spacing = spacing_warnings(&valid, &m.spacing);

        for flag in &validity.flags {
            tracing::warn!(%flag, "campaign precondition not met");
        }
        tracing::info!(
            %outcome,
            download = %download_verdict.outcome,
            upload = %upload_verdict.outcome,
            records = records.len(),
            valid = validity.valid_measurements,
            days = validity.distinct_days,
            "compliance evaluated"
        );

        Ok(ComplianceVerdict {
            outcome,
            download: download_verdict,
            upload: upload_verdict,
            validity,
            latency,
            daily,
            spacing_warnings: spacing,
            methodology: *m,
            profile: *profile,
        })
    }

    fn screen(&self, records: &RecordSet, direction: Direction) -> Screened {
        let mut speeds = Vec::with_capacity(records.len());
        let mut excluded = Vec::new();
        for record in records {
            match self.methodology.sanity.screen_speed(record, direction) {
                Some(exclusion) => {
                    tracing::debug!(%exclusion, "excluding implausible speed");
                    excluded.push(exclusion);
                }
                None => speeds.push(direction.speed_of(record)),
            }
        }
        Screened {
            direction,
            speeds,
            excluded,
        }
    }

    fn validity(&self, total: usize, valid: &RecordSet, excluded: usize) -> CampaignValidity {
        let m = &self.methodology;
        let distinct_days = group_by_day(valid).len();
        let mut flags = Vec::new();
        if valid.len() < m.min_measurements {
            flags.push(ValidityFlag::InsufficientMeasurements {
                found: valid.len(),
                required: m.min_measurements,
            });
        }
        if distinct_days < m.min_distinct_days {
            flags.push(ValidityFlag::InsufficientDaySpread {
                found: distinct_days,
                required: m.min_distinct_days,
            });
        }
        if let Some(max_fraction) = m.max_excluded_fraction {
            if total > 0 && excluded as f64 / total as f64 > max_fraction + RATIO_TOLERANCE {
                flags.push(ValidityFlag::ExcessiveExclusions {
                    excluded,
                    total,
                    max_fraction,
                });
            }
        }
        CampaignValidity {
            total_records: total,
            valid_measurements: valid.len(),
            distinct_days,
            excluded_records: excluded,
            flags,
        }
    }

    fn direction_verdict(&self, screened: Screened, profile: &DirectionProfile) -> DirectionVerdict {
        let m = &self.methodology;
        let tier1 = tier(&screened.speeds, profile.minimum_mbps, m.tier1_required);
        let tier2 = tier(&screened.speeds, profile.normal_mbps, m.tier2_required);
        let outcome = if screened.speeds.is_empty() {
            Outcome::Inconclusive
        } else if tier1.passed && tier2.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        DirectionVerdict {
            direction: screened.direction,
            minimum_mbps: profile.minimum_mbps,
            normal_mbps: profile.normal_mbps,
            valid_count: screened.speeds.len(),
            tier1,
            tier2,
            outcome,
            excluded: screened.excluded,
        }
    }

    fn latency_report(&self, records: &RecordSet) -> LatencyReport {
        let mut values = Vec::with_capacity(records.len());
        let mut excluded = Vec::new();
        for record in records {
            match self.methodology.sanity.screen_latency(record) {
                Some(exclusion) => excluded.push(exclusion),
                None => values.push(record.latency_ms as f64),
            }
        }
        LatencyReport {
            summary: MetricSummary::from_values(values),
            excluded,
        }
    }
}

/// Speeds that passed screening for one direction, plus the exclusions.
struct Screened {
    direction: Direction,
    speeds: Vec<f64>,
    excluded: Vec<Exclusion>,
}

fn tier(speeds: &[f64], threshold: f64, required: f64) -> TierResult {
    let satisfied = speeds.iter().filter(|&&s| s >= threshold).count();
    let ratio = (!speeds.is_empty()).then(|| satisfied as f64 / speeds.len() as f64);
    TierResult {
        threshold_mbps: threshold,
        required_ratio: required,
        satisfied,
        ratio,
        passed: ratio.is_some_and(|r| r + RATIO_TOLERANCE >= required),
    }
}

/// Check a contract profile for consistency.
///
/// # Errors
///
/// [`ConfigError`] for negative or non-finite speeds, a minimum above the
/// normal speed, or a maximum below it.
pub fn validate_profile(profile: &ContractProfile) -> Result<(), ConfigError> {
    for &direction in Direction::all() {
        let p = profile.for_direction(direction);
        let speeds = [
            ("minimum_mbps", Some(p.minimum_mbps)),
            ("normal_mbps", Some(p.normal_mbps)),
            ("maximum_mbps", p.maximum_mbps),
        ];
        for (field, value) in speeds {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidSpeed {
                        direction,
                        field,
                        value,
                    });
                }
            }
        }
        if p.minimum_mbps > p.normal_mbps {
            return Err(ConfigError::MinimumAboveNormal {
                direction,
                minimum_mbps: p.minimum_mbps,
                normal_mbps: p.normal_mbps,
            });
        }
        if let Some(maximum_mbps) = p.maximum_mbps {
            if maximum_mbps < p.normal_mbps {
                return Err(ConfigError::MaximumBelowNormal {
                    direction,
                    maximum_mbps,
                    normal_mbps: p.normal_mbps,
                });
            }
        }
    }
    Ok(())
}

/// Evaluate with a one-off evaluator.
///
/// # Errors
///
/// [`ConfigError`] if the methodology or profile is invalid.
pub fn evaluate(
    records: &RecordSet,
    profile: &ContractProfile,
    methodology: Methodology,
) -> Result<ComplianceVerdict, ConfigError> {
    Evaluator::new(methodology)?.evaluate(records, profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbm_core::{MeasuredAt, MeasurementRecord, TestId};
    use chrono::{Duration, NaiveDate};

    fn record(day: u32, minute: i64, down: f64, up: f64) -> MeasurementRecord {
        let base = NaiveDate::from_ymd_opt(2024, 10, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        MeasurementRecord::new(
            MeasuredAt::new(base + Duration::minutes(minute * 10)),
            TestId::new(&format!("{day}-{minute}")).unwrap(),
            down,
            up,
            20,
        )
    }

    fn profile() -> ContractProfile {
        ContractProfile::new(DirectionProfile::new(50.0, 100.0), DirectionProfile::new(10.0, 20.0))
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        let t = tier(&[50.0], 50.0, 0.9);
        assert_eq!(t.satisfied, 1);
        assert!(t.passed);
        let two_thirds = tier(&[1.0, 1.0, 0.0], 1.0, 2.0 / 3.0);
        assert!(two_thirds.passed);
    }

    #[test]
    fn empty_tier_has_no_ratio() {
        let t = tier(&[], 50.0, 0.9);
        assert_eq!(t.ratio, None);
        assert!(!t.passed);
    }

    #[test]
    fn empty_set_is_inconclusive_not_error() {
        let verdict = Evaluator::default().evaluate(&RecordSet::new(), &profile()).unwrap();
        assert_eq!(verdict.outcome, Outcome::Inconclusive);
        assert_eq!(verdict.download.outcome, Outcome::Inconclusive);
        assert_eq!(verdict.validity.flags.len(), 2);
        assert_eq!(verdict.latency.summary.count, 0);
    }

    #[test]
    fn failing_tier1_fails_direction() {
        let records: RecordSet = (0..20)
            .map(|i| record(1 + (i % 2) as u32, i, if i < 4 { 30.0 } else { 120.0 }, 25.0))
            .collect();
        let verdict = Evaluator::default().evaluate(&records, &profile()).unwrap();
        assert_eq!(verdict.download.tier1.satisfied, 16);
        assert!(!verdict.download.tier1.passed);
        assert_eq!(verdict.download.outcome, Outcome::Fail);
        assert_eq!(verdict.upload.outcome, Outcome::Pass);
        assert_eq!(verdict.outcome, Outcome::Fail);
    }

    #[test]
    fn latency_exclusion_does_not_affect_validity() {
        let mut records: Vec<MeasurementRecord> = (0..20)
            .map(|i| record(1 + (i % 2) as u32, i, 120.0, 25.0))
            .collect();
        records[0].latency_ms = -1;
        let verdict = Evaluator::default()
            .evaluate(&RecordSet::from_records(records), &profile())
            .unwrap();
        assert_eq!(verdict.latency.excluded.len(), 1);
        assert_eq!(verdict.latency.summary.count, 19);
        assert_eq!(verdict.validity.valid_measurements, 20);
        assert_eq!(verdict.outcome, Outcome::Pass);
    }

    #[test]
    fn excessive_exclusions_flagged_when_configured() {
        let mut records: Vec<MeasurementRecord> = (0..24)
            .map(|i| record(1 + (i % 2) as u32, i, 120.0, 25.0))
            .collect();
        for r in records.iter_mut().take(4) {
            r.upload_mbps = -1.0;
        }
        let methodology = Methodology {
            max_excluded_fraction: Some(0.1),
            ..Methodology::default()
        };
        let verdict = evaluate(&RecordSet::from_records(records), &profile(), methodology).unwrap();
        assert_eq!(verdict.validity.excluded_records, 4);
        assert!(verdict
            .validity
            .flags
            .iter()
            .any(|f| matches!(f, ValidityFlag::ExcessiveExclusions { .. })));
        assert_eq!(verdict.outcome, Outcome::Inconclusive);
    }

    #[test]
    fn profile_validation() {
        let negative = ContractProfile::new(DirectionProfile::new(-1.0, 10.0), DirectionProfile::new(1.0, 2.0));
        assert!(matches!(
            validate_profile(&negative),
            Err(ConfigError::InvalidSpeed { field: "minimum_mbps", .. })
        ));
        let low_max = ContractProfile::new(
            DirectionProfile::new(50.0, 100.0),
            DirectionProfile::new(5.0, 10.0).with_maximum(8.0),
        );
        assert!(matches!(
            validate_profile(&low_max),
            Err(ConfigError::MaximumBelowNormal { direction: Direction::Upload, .. })
        ));
        assert!(validate_profile(&profile()).is_ok());
    }

    #[test]
    fn invalid_methodology_rejected_up_front() {
        let m = Methodology {
            tier2_required: 2.0,
            ..Methodology::default()
        };
        assert!(Evaluator::new(m).is_err());
    }

    #[test]
    fn evaluator_exposes_validated_methodology() {
        let m = Methodology {
            min_measurements: 30,
            ..Methodology::default()
        };
        let evaluator = Evaluator::new(m).unwrap();
        assert_eq!(evaluator.methodology().min_measurements, 30);
        assert_eq!(evaluator.methodology().spacing.campaign_size(), 30);
    }

    #[test]
    fn unusable_spacing_rejected_up_front() {
        let mut m = Methodology::default();
        m.spacing.midday_pause_minutes = i64::MIN;
        assert!(matches!(
            Evaluator::new(m),
            Err(ConfigError::SpacingOutOfRange { field: "midday_pause_minutes", .. })
        ));
    }
}
