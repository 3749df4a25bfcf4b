//! # Ingest Errors
//!
//! Three severities:
//!
//! - [`SchemaError`]: the file's header is not a recognized layout. Fatal for
//!   that file only.
//! - [`RowSkipped`]: one data row could not be parsed. Accumulated, never
//!   fatal.
//! - [`LoadError`]: the file could not be read or decoded, or its schema was
//!   rejected. Reported per file by the loader.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Why a header was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaViolation {
    /// The file has no header row at all.
    EmptyFile,
    /// Required columns are absent.
    MissingColumns {
        /// Required column names that were not found.
        missing: Vec<String>,
        /// Header names that were present, normalized.
        found: Vec<String>,
    },
    /// The header row itself could not be read as delimited text.
    UnreadableHeader {
        /// Reader error text.
        reason: String,
    },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFile => f.write_str("file is empty (no header row)"),
            Self::MissingColumns { missing, found } => write!(
                f,
                "missing required column(s) {}; found [{}]",
                missing.join(", "),
                found.join(", ")
            ),
            Self::UnreadableHeader { reason } => write!(f, "unreadable header row: {reason}"),
        }
    }
}

/// Unrecognized header layout. The whole file is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("schema error in {file}: {violation}")]
pub struct SchemaError {
    /// Name of the rejected file.
    pub file: String,
    /// What was wrong with the header.
    pub violation: SchemaViolation,
}

/// Why a single data row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A required cell is absent or blank.
    MissingField {
        /// Column header of the missing cell.
        column: &'static str,
    },
    /// A numeric cell does not hold a finite number.
    InvalidNumber {
        /// Column header of the cell.
        column: &'static str,
        /// Raw cell text.
        value: String,
    },
    /// Date or time cell could not be parsed.
    InvalidTimestamp {
        /// Parser message.
        reason: String,
    },
    /// The delimited reader could not split the row.
    Malformed {
        /// Reader error text.
        reason: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { column } => write!(f, "missing value for column {column:?}"),
            Self::InvalidNumber { column, value } => {
                write!(f, "column {column:?} is not a number: {value:?}")
            }
            Self::InvalidTimestamp { reason } => write!(f, "{reason}"),
            Self::Malformed { reason } => write!(f, "malformed row: {reason}"),
        }
    }
}

/// A skipped data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSkipped {
    /// 1-based line number in the file; the header is line 1.
    pub line: u64,
    /// Why the row was skipped.
    pub reason: SkipReason,
}

impl std::fmt::Display for RowSkipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// A file that could not be turned into records.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Header layout rejected.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{file} is not valid UTF-8 (byte offset {valid_up_to})")]
    Encoding {
        /// Name of the file.
        file: String,
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },
}
