//! # bbm-core — Foundational Types for Broadband Measurement Evaluation
//!
//! This crate defines the data model shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `TestId` and `MeasuredAt`
//!    are newtypes. A test identifier cannot be confused with a display
//!    string, and a measurement timestamp always carries the local wall-clock
//!    semantics of the source export.
//!
//! 2. **`RecordSet` owns the ordering invariant.** The only ways to build a
//!    `RecordSet` sort by `(timestamp, test_id)` and drop duplicate keys, so
//!    every consumer iterates non-decreasing timestamps by construction.
//!
//! 3. **Single `Metric` enum.** Download, upload, and latency are the only
//!    numeric metrics. Every `match` on `Metric` is exhaustive.
//!
//! 4. **Records are immutable.** A `MeasurementRecord` is created once by the
//!    parser and never mutated afterwards. Implausible values are kept as-is
//!    and judged later by the compliance sanity filter.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bbm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod metric;
pub mod profile;
pub mod record;
pub mod record_set;
pub mod temporal;

pub use error::CoreError;
pub use metric::{Direction, Metric};
pub use profile::{ContractProfile, DirectionProfile};
pub use record::{MeasurementRecord, RecordKey, RecordWarning, TestId};
pub use record_set::RecordSet;
pub use temporal::MeasuredAt;
