//! # Record Store
//!
//! Thread-safe, cloneable container for measurement records, keyed by
//! [`RecordKey`]. Clones share the same underlying map.

use std::collections::BTreeMap;
use std::sync::Arc;

use bbm_core::{MeasurementRecord, RecordKey, RecordSet};
use parking_lot::RwLock;
use serde::Serialize;

/// Counts reported by one [`RecordStore::ingest`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Records whose key was not present before.
    pub inserted: usize,
    /// Records that replaced an existing record with the same key.
    pub replaced: usize,
}

impl IngestSummary {
    /// Total records processed.
    pub fn total(&self) -> usize {
        self.inserted + self.replaced
    }
}

/// Deduplicating in-memory measurement store.
///
/// The lock is `parking_lot`, so a panicking writer does not poison the
/// store for later readers.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Arc<RwLock<BTreeMap<RecordKey, MeasurementRecord>>>,
}

impl Clone for RecordStore {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of records.
    ///
    /// Records are applied in iteration order under a single write lock.
    /// When a key already exists, whether from an earlier batch or earlier
    /// in this one, the incoming record replaces it.
    pub fn ingest(&self, records: impl IntoIterator<Item = MeasurementRecord>) -> IngestSummary {
        let mut summary = IngestSummary::default();
        let mut guard = self.records.write();
        for record in records {
            match guard.insert(record.key(), record) {
                Some(_) => summary.replaced += 1,
                None => summary.inserted += 1,
            }
        }
        let stored = guard.len();
        drop(guard);

        tracing::info!(
            inserted = summary.inserted,
            replaced = summary.replaced,
            stored,
            "ingested measurement records"
        );
        summary
    }

    /// Snapshot of every stored record in key order.
    pub fn all(&self) -> RecordSet {
        let guard = self.records.read();
        RecordSet::from_records(guard.values().cloned())
    }

    /// Look up one record.
    pub fn get(&self, key: &RecordKey) -> Option<MeasurementRecord> {
        self.records.read().get(key).cloned()
    }

    /// Remove every record.
    pub fn clear(&self) {
        let mut guard = self.records.write();
        let removed = guard.len();
        guard.clear();
        tracing::debug!(removed, "cleared record store");
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
