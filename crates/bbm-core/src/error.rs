//! # Error Types
//!
//! Errors raised while constructing core values from caller input. All
//! errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Error building a core value from untrusted text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Date or time text did not match the expected export format.
    #[error("invalid measurement timestamp {input:?}: expected {expected}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Human-readable description of the accepted format.
        expected: &'static str,
    },

    /// Metric name is not one of the known metrics.
    #[error("unknown metric {0:?}; expected one of download, upload, latency")]
    UnknownMetric(String),

    /// Direction name is not `download` or `upload`.
    #[error("unknown direction {0:?}; expected download or upload")]
    UnknownDirection(String),

    /// A test identifier was empty after trimming.
    #[error("test id must not be empty")]
    EmptyTestId,
}
