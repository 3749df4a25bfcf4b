//! # Configuration Errors
//!
//! The only fatal error of evaluation: the caller supplied a contract
//! profile or methodology that cannot be evaluated against.

use bbm_core::Direction;
use thiserror::Error;

/// Invalid contract profile or methodology.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The guaranteed floor is above the advertised normal speed.
    #[error("{direction}: minimum speed {minimum_mbps} Mbit/s exceeds normal speed {normal_mbps} Mbit/s")]
    MinimumAboveNormal {
        direction: Direction,
        minimum_mbps: f64,
        normal_mbps: f64,
    },

    /// The advertised maximum is below the advertised normal speed.
    #[error("{direction}: maximum speed {maximum_mbps} Mbit/s is below normal speed {normal_mbps} Mbit/s")]
    MaximumBelowNormal {
        direction: Direction,
        maximum_mbps: f64,
        normal_mbps: f64,
    },

    /// A profile speed is negative, NaN or infinite.
    #[error("{direction}: {field} must be a finite, non-negative number, got {value}")]
    InvalidSpeed {
        direction: Direction,
        field: &'static str,
        value: f64,
    },

    /// A methodology ratio lies outside `[0, 1]`.
    #[error("methodology: {field} must lie in [0, 1], got {value}")]
    RatioOutOfRange { field: &'static str, value: f64 },

    /// A methodology count that must be positive is zero.
    #[error("methodology: {field} must be at least 1")]
    ZeroRequirement { field: &'static str },

    /// A sanity bound is not a positive finite number.
    #[error("methodology: {field} must be positive and finite, got {value}")]
    InvalidBound { field: &'static str, value: f64 },

    /// A spacing rule lies outside its accepted range.
    #[error("methodology: spacing.{field} must lie in [{min}, {max}], got {value}")]
    SpacingOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// `spacing.days × spacing.per_day` does not fit in a campaign size.
    #[error("methodology: spacing of {days} day(s) x {per_day} measurement(s) is too large")]
    CampaignTooLarge { days: usize, per_day: usize },
}
