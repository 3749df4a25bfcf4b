//! # bbm-ingest — Measurement File Parsing
//!
//! Turns Breitbandmessung CSV exports into [`MeasurementRecord`]s.
//!
//! ## Pipeline
//!
//! 1. **Header schema** (`schema.rs`): the header row is matched against the
//!    recognized German column names. A missing required column rejects the
//!    whole file with a [`SchemaError`].
//! 2. **Row parsing** (`parser.rs`): every data row is parsed on its own.
//!    A malformed row becomes a [`RowSkipped`] entry with its line number;
//!    the rest of the file still loads.
//! 3. **File date check** (`file_date.rs`): the capture date encoded in the
//!    file name is compared with each row's timestamp, and rows more than one
//!    calendar day away get a warning annotation.
//! 4. **Loading** (`loader.rs`): many files are decoded and parsed in
//!    parallel. The parser is pure, so files share no state; merging into a
//!    store is left to the caller.
//!
//! ## Crate Policy
//!
//! - No filesystem traversal. Callers pass explicit paths or byte buffers.
//! - Data problems never panic and never abort a batch.
//!
//! [`MeasurementRecord`]: bbm_core::MeasurementRecord

pub mod decimal;
pub mod error;
pub mod file_date;
pub mod loader;
pub mod parser;
pub mod schema;

pub use error::{LoadError, RowSkipped, SchemaError, SchemaViolation, SkipReason};
pub use file_date::{file_date_from_name, is_measurement_file_name, MEASUREMENT_FILE_PREFIX};
pub use loader::{load_paths, load_sources, FileReport, LoadReport, SourceFile};
pub use parser::{parse_measurement_file, ParsedFile};
pub use schema::{Column, HeaderLayout};
