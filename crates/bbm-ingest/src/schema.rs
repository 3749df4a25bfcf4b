//! # Header Schema
//!
//! Recognized columns of the Breitbandmessung export. The header row is
//! matched case-insensitively after trimming whitespace, quotes and a UTF-8
//! byte-order mark. Extra columns are ignored; a missing required column
//! rejects the file.

use csv::StringRecord;

use crate::error::{SchemaError, SchemaViolation};

/// A recognized export column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// `Messzeitpunkt`, the date `DD.MM.YYYY`.
    Date,
    /// `Uhrzeit`, the time `HH:MM:SS`.
    Time,
    /// `Download (Mbit/s)`.
    Download,
    /// `Upload (Mbit/s)`.
    Upload,
    /// `Laufzeit (ms)`.
    Latency,
    /// `Test-ID`.
    TestId,
    /// `Version` of the measurement client.
    Version,
    /// `Betriebssystem`.
    Os,
    /// `Internet-Browser`.
    Browser,
}

impl Column {
    /// Every recognized column, required ones first.
    pub const ALL: [Column; 9] = [
        Self::Date,
        Self::Time,
        Self::Download,
        Self::Upload,
        Self::Latency,
        Self::TestId,
        Self::Version,
        Self::Os,
        Self::Browser,
    ];

    /// Header text as written by the export.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Date => "Messzeitpunkt",
            Self::Time => "Uhrzeit",
            Self::Download => "Download (Mbit/s)",
            Self::Upload => "Upload (Mbit/s)",
            Self::Latency => "Laufzeit (ms)",
            Self::TestId => "Test-ID",
            Self::Version => "Version",
            Self::Os => "Betriebssystem",
            Self::Browser => "Internet-Browser",
        }
    }

    /// Whether a file without this column is rejected.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Version | Self::Os | Self::Browser)
    }

    fn slot(&self) -> usize {
        match self {
            Self::Date => 0,
            Self::Time => 1,
            Self::Download => 2,
            Self::Upload => 3,
            Self::Latency => 4,
            Self::TestId => 5,
            Self::Version => 6,
            Self::Os => 7,
            Self::Browser => 8,
        }
    }
}

/// Column positions resolved from one file's header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    positions: [Option<usize>; 9],
}

impl HeaderLayout {
    /// Resolve a header row.
    ///
    /// # Errors
    ///
    /// [`SchemaError`] with [`SchemaViolation::EmptyFile`] for an empty
    /// header row, or [`SchemaViolation::MissingColumns`] listing every
    /// required column that is absent.
    pub fn from_headers(file: &str, headers: &StringRecord) -> Result<Self, SchemaError> {
        let found: Vec<String> = headers.iter().map(normalize_header).collect();
        if found.iter().all(String::is_empty) {
            return Err(SchemaError {
                file: file.to_string(),
                violation: SchemaViolation::EmptyFile,
            });
        }

        let mut positions = [None; 9];
        for column in Column::ALL {
            let wanted = column.header().to_lowercase();
            positions[column.slot()] = found.iter().position(|name| *name == wanted);
        }

        let missing: Vec<String> = Column::ALL
            .iter()
            .filter(|c| c.is_required() && positions[c.slot()].is_none())
            .map(|c| c.header().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError {
                file: file.to_string(),
                violation: SchemaViolation::MissingColumns { missing, found },
            });
        }

        Ok(Self { positions })
    }

    /// Field index of a column, if present in this file.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions[column.slot()]
    }

    /// Cell text for `column` in `row`, trimmed and unquoted.
    ///
    /// `None` if the column is absent from the file or the row is short.
    pub fn cell<'r>(&self, row: &'r StringRecord, column: Column) -> Option<&'r str> {
        let idx = self.position(column)?;
        row.get(idx).map(|v| v.trim().trim_matches('"').trim())
    }
}

fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .trim_matches('"')
        .trim()
        .to_lowercase()
}
