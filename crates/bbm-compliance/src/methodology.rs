//! # Methodology
//!
//! Thresholds and bounds that parameterize evaluation. Defaults follow the
//! two-tier regulator methodology; every value can be overridden from
//! configuration.

use bbm_analysis::ProtocolRules;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for spacing and pause rules, in minutes (one week).
pub const MAX_SPACING_MINUTES: i64 = 7 * 24 * 60;

/// Upper bound for day-based spacing rules (ten years).
pub const MAX_SPACING_DAYS: i64 = 3660;

/// Plausibility limits for raw measurement values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityBounds {
    /// Speeds above this are treated as measurement artefacts.
    pub max_plausible_mbps: f64,
    /// Latencies above this are treated as measurement artefacts.
    pub max_plausible_latency_ms: i64,
}

impl Default for SanityBounds {
    fn default() -> Self {
        Self {
            max_plausible_mbps: 100_000.0,
            max_plausible_latency_ms: 60_000,
        }
    }
}

/// Evaluation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Methodology {
    /// Valid measurements needed for a conclusive verdict.
    pub min_measurements: usize,
    /// Distinct calendar days the valid measurements must cover.
    pub min_distinct_days: usize,
    /// Required share of measurements at or above the minimum speed.
    pub tier1_required: f64,
    /// Required share of measurements at or above the normal speed.
    pub tier2_required: f64,
    /// Largest tolerated share of sanity-excluded records, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_excluded_fraction: Option<f64>,
    pub sanity: SanityBounds,
    /// Share of the declared maximum a day must reach once to count in the
    /// daily evidence.
    pub maximum_share: f64,
    /// Spacing rules reported as warnings.
    pub spacing: ProtocolRules,
}

impl Default for Methodology {
    fn default() -> Self {
        Self {
            min_measurements: 20,
            min_distinct_days: 2,
            tier1_required: 0.90,
            tier2_required: 2.0 / 3.0,
            max_excluded_fraction: None,
            sanity: SanityBounds::default(),
            maximum_share: 0.90,
            spacing: ProtocolRules::default(),
        }
    }
}

impl Methodology {
    /// Check that every parameter is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("tier1_required", self.tier1_required)?;
        check_ratio("tier2_required", self.tier2_required)?;
        check_ratio("maximum_share", self.maximum_share)?;
        if let Some(fraction) = self.max_excluded_fraction {
            check_ratio("max_excluded_fraction", fraction)?;
        }
        if self.min_distinct_days == 0 {
            return Err(ConfigError::ZeroRequirement {
                field: "min_distinct_days",
            });
        }
        let max_mbps = self.sanity.max_plausible_mbps;
        if !max_mbps.is_finite() || max_mbps <= 0.0 {
            return Err(ConfigError::InvalidBound {
                field: "max_plausible_mbps",
                value: max_mbps,
            });
        }
        if self.sanity.max_plausible_latency_ms <= 0 {
            return Err(ConfigError::InvalidBound {
                field: "max_plausible_latency_ms",
                value: self.sanity.max_plausible_latency_ms as f64,
            });
        }
        validate_spacing(&self.spacing)
    }
}

fn validate_spacing(rules: &ProtocolRules) -> Result<(), ConfigError> {
    if rules.days == 0 {
        return Err(ConfigError::ZeroRequirement { field: "spacing.days" });
    }
    if rules.per_day == 0 {
        return Err(ConfigError::ZeroRequirement {
            field: "spacing.per_day",
        });
    }
    if rules.days.checked_mul(rules.per_day).is_none() {
        return Err(ConfigError::CampaignTooLarge {
            days: rules.days,
            per_day: rules.per_day,
        });
    }
    check_range("min_spacing_minutes", rules.min_spacing_minutes, 0, MAX_SPACING_MINUTES)?;
    check_range("midday_pause_minutes", rules.midday_pause_minutes, 0, MAX_SPACING_MINUTES)?;
    check_range("min_day_gap", rules.min_day_gap, 0, MAX_SPACING_DAYS)?;
    check_range("max_span_days", rules.max_span_days, 0, MAX_SPACING_DAYS)
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::SpacingOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { field, value })
    }
}
