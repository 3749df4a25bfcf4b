//! # Record Parser
//!
//! Parses the text of one export file. The parser is pure: it touches no
//! shared state and performs no I/O, so any number of files can be parsed
//! concurrently.
//!
//! Partial success is a normal outcome. A file with a valid header always
//! yields a [`ParsedFile`], even if every data row was skipped.

use bbm_core::{MeasuredAt, MeasurementRecord, RecordWarning, TestId};
use chrono::NaiveDate;
use csv::StringRecord;

use crate::decimal::{parse_decimal, parse_whole};
use crate::error::{RowSkipped, SchemaError, SchemaViolation, SkipReason};
use crate::file_date::{differs_by_more_than_a_day, file_date_from_name};
use crate::schema::{Column, HeaderLayout};

/// Field delimiter of the export.
pub const FIELD_DELIMITER: u8 = b';';

/// Result of parsing one file with a recognized header.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Name of the parsed file.
    pub file_name: String,
    /// Capture date derived from the file name, if any.
    pub file_date: Option<NaiveDate>,
    /// Successfully parsed records in file order.
    pub records: Vec<MeasurementRecord>,
    /// Rows that could not be parsed.
    pub skipped: Vec<RowSkipped>,
}

impl ParsedFile {
    /// Number of records carrying at least one warning.
    pub fn warned_records(&self) -> usize {
        self.records.iter().filter(|r| !r.warnings.is_empty()).count()
    }
}

/// Parse one measurement file.
///
/// `file_name` is used for error reporting and for the file-date check; it
/// should be the bare name, not a full path.
///
/// # Errors
///
/// [`SchemaError`] when the header row is missing or not a recognized
/// layout. Row-level problems are reported in [`ParsedFile::skipped`].
pub fn parse_measurement_file(file_name: &str, text: &str) -> Result<ParsedFile, SchemaError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().cloned().map_err(|e| SchemaError {
        file: file_name.to_string(),
        violation: SchemaViolation::UnreadableHeader {
            reason: e.to_string(),
        },
    })?;
    let layout = HeaderLayout::from_headers(file_name, &headers)?;
    let file_date = file_date_from_name(file_name);

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                skipped.push(RowSkipped {
                    line,
                    reason: SkipReason::Malformed {
                        reason: e.to_string(),
                    },
                });
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(fallback_line);

        match parse_row(&layout, &row) {
            Ok(record) => records.push(annotate(record, file_name, file_date)),
            Err(reason) => {
                tracing::debug!(file = file_name, line, %reason, "skipping row");
                skipped.push(RowSkipped { line, reason });
            }
        }
    }

    if !skipped.is_empty() {
        tracing::warn!(
            file = file_name,
            skipped = skipped.len(),
            parsed = records.len(),
            "file contained malformed rows"
        );
    }
    tracing::debug!(file = file_name, records = records.len(), "parsed measurement file");

    Ok(ParsedFile {
        file_name: file_name.to_string(),
        file_date,
        records,
        skipped,
    })
}

fn parse_row(layout: &HeaderLayout, row: &StringRecord) -> Result<MeasurementRecord, SkipReason> {
    let date = required(layout, row, Column::Date)?;
    let time = required(layout, row, Column::Time)?;
    let timestamp = MeasuredAt::parse_export(date, time).map_err(|e| {
        SkipReason::InvalidTimestamp {
            reason: e.to_string(),
        }
    })?;

    let download = number(layout, row, Column::Download)?;
    let upload = number(layout, row, Column::Upload)?;
    let latency_raw = required(layout, row, Column::Latency)?;
    let latency = parse_whole(latency_raw).ok_or_else(|| SkipReason::InvalidNumber {
        column: Column::Latency.header(),
        value: latency_raw.to_string(),
    })?;

    let test_id_raw = required(layout, row, Column::TestId)?;
    let test_id = TestId::new(test_id_raw).map_err(|_| SkipReason::MissingField {
        column: Column::TestId.header(),
    })?;

    let optional = |column| layout.cell(row, column).unwrap_or_default();
    Ok(
        MeasurementRecord::new(timestamp, test_id, download, upload, latency).with_metadata(
            optional(Column::Os),
            optional(Column::Browser),
            optional(Column::Version),
        ),
    )
}

fn required<'r>(
    layout: &HeaderLayout,
    row: &'r StringRecord,
    column: Column,
) -> Result<&'r str, SkipReason> {
    match layout.cell(row, column) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SkipReason::MissingField {
            column: column.header(),
        }),
    }
}

fn number(layout: &HeaderLayout, row: &StringRecord, column: Column) -> Result<f64, SkipReason> {
    let raw = required(layout, row, column)?;
    parse_decimal(raw).ok_or_else(|| SkipReason::InvalidNumber {
        column: column.header(),
        value: raw.to_string(),
    })
}

fn annotate(
    record: MeasurementRecord,
    file_name: &str,
    file_date: Option<NaiveDate>,
) -> MeasurementRecord {
    match file_date {
        Some(file_date) if differs_by_more_than_a_day(file_date, record.date()) => {
            let measured_date = record.date();
            tracing::warn!(
                file = file_name,
                %file_date,
                %measured_date,
                test_id = %record.test_id,
                "file name date conflicts with measurement timestamp"
            );
            record.with_warning(RecordWarning::FileDateMismatch {
                file_name: file_name.to_string(),
                file_date,
                measured_date,
            })
        }
        _ => record,
    }
}
