//! # Sanity Screening
//!
//! Flags structurally valid but implausible values. A flagged value is
//! excluded from the ratios it would feed and reported with its reason; the
//! record itself is never changed or removed.

use std::fmt;

use bbm_core::{Direction, MeasurementRecord, Metric, RecordKey};
use serde::Serialize;

use crate::methodology::SanityBounds;

/// Why a value was excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Below zero.
    Negative { value: f64 },
    /// Above the configured plausibility bound.
    AboveBound { value: f64, bound: f64 },
    /// NaN or infinite.
    NotFinite,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { value } => write!(f, "negative value {value}"),
            Self::AboveBound { value, bound } => {
                write!(f, "value {value} above plausible bound {bound}")
            }
            Self::NotFinite => f.write_str("value is not a finite number"),
        }
    }
}

/// One excluded value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    /// Record the value belongs to. The record itself is kept.
    pub key: RecordKey,
    /// Which value was excluded.
    pub metric: Metric,
    /// Why it was excluded.
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {}",
            self.key.timestamp, self.key.test_id, self.metric, self.reason
        )
    }
}

impl SanityBounds {
    /// Exclusion for `record`'s speed in `direction`, if implausible.
    pub fn screen_speed(&self, record: &MeasurementRecord, direction: Direction) -> Option<Exclusion> {
        let value = direction.speed_of(record);
        let reason = if !value.is_finite() {
            ExclusionReason::NotFinite
        } else if value < 0.0 {
            ExclusionReason::Negative { value }
        } else if value > self.max_plausible_mbps {
            ExclusionReason::AboveBound {
                value,
                bound: self.max_plausible_mbps,
            }
        } else {
            return None;
        };
        Some(Exclusion {
            key: record.key(),
            metric: direction.metric(),
            reason,
        })
    }

    /// Exclusion for `record`'s latency, if implausible.
    pub fn screen_latency(&self, record: &MeasurementRecord) -> Option<Exclusion> {
        let value = record.latency_ms;
        let reason = if value < 0 {
            ExclusionReason::Negative {
                value: value as f64,
            }
        } else if value > self.max_plausible_latency_ms {
            ExclusionReason::AboveBound {
                value: value as f64,
                bound: self.max_plausible_latency_ms as f64,
            }
        } else {
            return None;
        };
        Some(Exclusion {
            key: record.key(),
            metric: Metric::Latency,
            reason,
        })
    }
}
