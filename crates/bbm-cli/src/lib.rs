//! # bbm-cli — Command-Line Front End
//!
//! Provides the `bbm` command for working with Breitbandmessung exports.
//!
//! ## Subcommands
//!
//! - `bbm ingest` — Parse every export in the measurement directory and
//!   report per-file results, skipped rows and totals.
//! - `bbm stats` — Count, mean, min, max and percentiles for a selection.
//! - `bbm check` — Two-tier compliance verdict against the contract speeds,
//!   optionally over an automatically chosen protocol campaign.
//!
//! ```bash
//! bbm --data-path ./messungen ingest --show-skipped
//! bbm stats --last-days 14 --metric download --metric ping
//! bbm check --download-min 150 --download-normal 210 \
//!           --upload-min 15 --upload-normal 30 --format json
//! bbm check --protocol
//! ```
//!
//! ## Exit Codes
//!
//! - 0: success, or a `PASS` verdict.
//! - 1: a `FAIL` or `INCONCLUSIVE` verdict.
//! - 2: configuration, input or I/O error.

pub mod check;
pub mod config;
pub mod ingest;
pub mod output;
pub mod selection;
pub mod stats;

/// Exit code for operational and configuration errors.
pub const EXIT_ERROR: u8 = 2;
