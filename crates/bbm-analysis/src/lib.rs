//! # bbm-analysis — Statistics and Campaign Selection
//!
//! Read-only computations over a [`bbm_core::RecordSet`]:
//!
//! - **aggregate**: per-metric count, mean, min, max and percentiles.
//! - **percentile**: linear interpolation between order statistics.
//! - **selector**: subset selection by key, test id, date range or
//!   trailing timeframe, and grouping by calendar day.
//! - **protocol**: automatic selection of a regulator-shaped campaign
//!   (days × measurements per day with spacing rules).
//! - **spacing**: non-fatal warnings for measurements taken too close
//!   together.
//!
//! Nothing here mutates its input or caches results. Every function takes
//! records by reference and returns a fresh value.
//!
//! ## Crate Policy
//!
//! - Depends only on `bbm-core`.
//! - Percentile method is fixed; there is no configuration knob for it.
//! - No `unsafe` code.

pub mod aggregate;
pub mod percentile;
pub mod protocol;
pub mod selector;
pub mod spacing;

pub use aggregate::{compute, MetricSummary, Statistics};
pub use percentile::percentile;
pub use protocol::{select_protocol_campaign, ProtocolRules};
pub use selector::{group_by_day, select, select_all, Selection};
pub use spacing::{spacing_warnings, SpacingWarning};
