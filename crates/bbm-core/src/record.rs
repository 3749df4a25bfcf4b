//! # Measurement Records
//!
//! A `MeasurementRecord` is one speed test as read from an export file.
//! Records are created once by the parser and handed around by reference;
//! nothing in the workspace mutates a record after construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::temporal::MeasuredAt;

/// Opaque test identifier assigned by the measurement tool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    /// Build a test id, trimming whitespace and surrounding quotes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyTestId`] if nothing remains after trimming.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyTestId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplication key of a record.
///
/// Field order makes the derived `Ord` sort by timestamp first, which is the
/// iteration order of a `RecordSet`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// When the test ran.
    pub timestamp: MeasuredAt,
    /// Which test it was.
    pub test_id: TestId,
}

/// Non-fatal annotation attached to a record at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordWarning {
    /// The date encoded in the file name is more than one calendar day away
    /// from the row's own timestamp. The row timestamp is kept.
    FileDateMismatch {
        /// Name of the file the row came from.
        file_name: String,
        /// Date derived from the file name.
        file_date: NaiveDate,
        /// Date of the row timestamp.
        measured_date: NaiveDate,
    },
}

impl std::fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileDateMismatch {
                file_name,
                file_date,
                measured_date,
            } => write!(
                f,
                "WARNING: file {file_name} is dated {file_date} but the measurement was taken on {measured_date}"
            ),
        }
    }
}

/// One broadband speed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Local wall-clock time of the test.
    pub timestamp: MeasuredAt,
    /// Tool-assigned identifier.
    pub test_id: TestId,
    /// Download throughput in Mbit/s.
    pub download_mbps: f64,
    /// Upload throughput in Mbit/s.
    pub upload_mbps: f64,
    /// Round-trip latency in milliseconds.
    pub latency_ms: i64,
    /// Operating system reported by the tool.
    #[serde(default)]
    pub os: String,
    /// Browser reported by the tool.
    #[serde(default)]
    pub browser: String,
    /// Version of the measurement client.
    #[serde(default)]
    pub client_version: String,
    /// Parse-time annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RecordWarning>,
}

impl MeasurementRecord {
    /// Create a record with empty display metadata.
    pub fn new(
        timestamp: MeasuredAt,
        test_id: TestId,
        download_mbps: f64,
        upload_mbps: f64,
        latency_ms: i64,
    ) -> Self {
        Self {
            timestamp,
            test_id,
            download_mbps,
            upload_mbps,
            latency_ms,
            os: String::new(),
            browser: String::new(),
            client_version: String::new(),
            warnings: Vec::new(),
        }
    }

    /// Attach display metadata.
    pub fn with_metadata(
        mut self,
        os: impl Into<String>,
        browser: impl Into<String>,
        client_version: impl Into<String>,
    ) -> Self {
        self.os = os.into();
        self.browser = browser.into();
        self.client_version = client_version.into();
        self
    }

    /// Attach a parse-time warning.
    pub fn with_warning(mut self, warning: RecordWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// The deduplication key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            timestamp: self.timestamp,
            test_id: self.test_id.clone(),
        }
    }

    /// Calendar day of the measurement.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}
