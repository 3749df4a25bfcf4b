//! # bbm-store — Measurement Record Store
//!
//! Holds the deduplicated set of measurement records a session works on.
//!
//! ## Architecture
//!
//! Parsing happens in parallel in `bbm-ingest`; the results are merged here
//! through one serialized [`RecordStore::ingest`] call per batch. Readers
//! never see a half-applied batch: `ingest` and `clear` hold the write lock
//! for their whole duration, and [`RecordStore::all`] copies a snapshot out
//! under the read lock.
//!
//! ## Crate Policy
//!
//! - Depends only on `bbm-core`.
//! - No persistence. The store lives as long as the process.
//! - No `unsafe` code.

pub mod store;

pub use store::{IngestSummary, RecordStore};
