//! # bbm-compliance — Compliance Evaluation
//!
//! Decides whether a measurement campaign shows that a connection meets its
//! contracted speeds, using a two-tier methodology applied to download and
//! upload independently:
//!
//! - **Tier 1**: share of measurements at or above the guaranteed minimum.
//! - **Tier 2**: share of measurements at or above the advertised normal
//!   speed.
//!
//! A direction passes when both tiers reach their required ratios. The
//! campaign as a whole is `INCONCLUSIVE` when it is too small or spread over
//! too few days, `PASS` when both directions pass, and `FAIL` otherwise.
//! Latency is summarized but never gates the outcome.
//!
//! ## Evaluation Pipeline
//!
//! 1. Validate the [`Methodology`] and [`bbm_core::ContractProfile`]. Bad
//!    caller input is a [`ConfigError`]; no verdict is produced.
//! 2. Screen every record against [`SanityBounds`]. Implausible values are
//!    excluded from ratios with a reason but stay in the record set.
//! 3. Check campaign validity and collect [`ValidityFlag`]s.
//! 4. Compute tier ratios and direction outcomes.
//! 5. Attach latency summary, daily evidence and spacing warnings.
//!
//! Data problems never make evaluation fail. They surface as exclusions,
//! flags or an `INCONCLUSIVE` outcome.
//!
//! ## Crate Policy
//!
//! - Depends on `bbm-core` and `bbm-analysis` only.
//! - All thresholds come from [`Methodology`]; none are hard-coded in the
//!   evaluator.
//! - No `unsafe` code.

pub mod daily;
pub mod error;
pub mod evaluator;
pub mod methodology;
pub mod sanity;
pub mod verdict;

pub use daily::{daily_evidence, DayEvidence, DirectionDailyEvidence};
pub use error::ConfigError;
pub use evaluator::{evaluate, validate_profile, Evaluator};
pub use methodology::{Methodology, SanityBounds, MAX_SPACING_DAYS, MAX_SPACING_MINUTES};
pub use sanity::{Exclusion, ExclusionReason};
pub use verdict::{
    CampaignValidity, ComplianceVerdict, DirectionVerdict, LatencyReport, Outcome, TierResult,
    ValidityFlag,
};
