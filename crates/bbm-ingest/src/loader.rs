//! # Parallel Loader
//!
//! Reads, decodes and parses many export files concurrently with `rayon`.
//! Results come back in input order so that "later file wins" deduplication
//! downstream stays deterministic regardless of scheduling.
//!
//! The loader never merges records itself. Callers feed
//! [`LoadReport::into_records`] to a single serialized store ingest.

use std::path::{Path, PathBuf};

use bbm_core::MeasurementRecord;
use rayon::prelude::*;

use crate::error::LoadError;
use crate::parser::{parse_measurement_file, ParsedFile};

/// An in-memory file to parse.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name used for reporting and the file-date check.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Wrap a named buffer.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileReport {
    /// File name as reported to the user.
    pub name: String,
    /// Parsed content, or why the file was rejected.
    pub result: Result<ParsedFile, LoadError>,
}

/// Outcome for a batch of files, in input order.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Per-file outcomes.
    pub files: Vec<FileReport>,
}

impl LoadReport {
    /// Files that parsed (possibly with skipped rows).
    pub fn parsed(&self) -> impl Iterator<Item = &ParsedFile> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }

    /// Files that were rejected, with the reason.
    pub fn rejected(&self) -> impl Iterator<Item = (&str, &LoadError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.name.as_str(), e)))
    }

    /// Total parsed records across all files.
    pub fn record_count(&self) -> usize {
        self.parsed().map(|p| p.records.len()).sum()
    }

    /// Total skipped rows across all files.
    pub fn skipped_count(&self) -> usize {
        self.parsed().map(|p| p.skipped.len()).sum()
    }

    /// All parsed records, file by file in input order.
    pub fn into_records(self) -> Vec<MeasurementRecord> {
        self.files
            .into_iter()
            .filter_map(|f| f.result.ok())
            .flat_map(|p| p.records)
            .collect()
    }
}

/// Read and parse files from disk in parallel.
pub fn load_paths(paths: &[PathBuf]) -> LoadReport {
    let files: Vec<FileReport> = paths.par_iter().map(|path| load_path(path)).collect();
    finish(files)
}

/// Parse in-memory buffers in parallel.
pub fn load_sources(sources: Vec<SourceFile>) -> LoadReport {
    let files: Vec<FileReport> = sources
        .into_par_iter()
        .map(|source| {
            let result = decode(&source.name, &source.bytes)
                .and_then(|text| parse_measurement_file(&source.name, text).map_err(LoadError::from));
            FileReport {
                name: source.name,
                result,
            }
        })
        .collect();
    finish(files)
}

fn load_path(path: &Path) -> FileReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let result = std::fs::read(path)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| {
            let text = decode(&name, &bytes)?;
            parse_measurement_file(&name, text).map_err(LoadError::from)
        });
    FileReport { name, result }
}

fn decode<'b>(name: &str, bytes: &'b [u8]) -> Result<&'b str, LoadError> {
    std::str::from_utf8(bytes).map_err(|e| LoadError::Encoding {
        file: name.to_string(),
        valid_up_to: e.valid_up_to(),
    })
}

fn finish(files: Vec<FileReport>) -> LoadReport {
    let report = LoadReport { files };
    for (name, error) in report.rejected() {
        tracing::warn!(file = name, error = %error, "rejected measurement file");
    }
    tracing::info!(
        files = report.files.len(),
        records = report.record_count(),
        skipped_rows = report.skipped_count(),
        "loaded measurement files"
    );
    report
}
