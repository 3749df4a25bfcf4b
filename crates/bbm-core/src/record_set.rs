//! # Record Sets
//!
//! An ordered, deduplicated collection of [`MeasurementRecord`]s.
//!
//! ## Invariants
//!
//! - No two records share a [`RecordKey`] `(timestamp, test_id)`.
//! - Iteration yields records in ascending key order, hence non-decreasing
//!   timestamps.
//!
//! Both hold by construction: every constructor funnels through
//! [`RecordSet::from_records`], and [`RecordSet::filter`] only removes
//! elements from an already ordered set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{MeasurementRecord, RecordKey};

/// Ordered, deduplicated measurement records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MeasurementRecord>", into = "Vec<MeasurementRecord>")]
pub struct RecordSet {
    records: Vec<MeasurementRecord>,
}

impl RecordSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from records in arrival order.
    ///
    /// When two records share a key, the one that arrives later wins.
    pub fn from_records(records: impl IntoIterator<Item = MeasurementRecord>) -> Self {
        let mut by_key: BTreeMap<RecordKey, MeasurementRecord> = BTreeMap::new();
        for record in records {
            by_key.insert(record.key(), record);
        }
        Self {
            records: by_key.into_values().collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate in timestamp order.
    pub fn iter(&self) -> std::slice::Iter<'_, MeasurementRecord> {
        self.records.iter()
    }

    /// Borrow the ordered records.
    pub fn as_slice(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Earliest record.
    pub fn first(&self) -> Option<&MeasurementRecord> {
        self.records.first()
    }

    /// Latest record.
    pub fn last(&self) -> Option<&MeasurementRecord> {
        self.records.last()
    }

    /// Keep only records matching `predicate`, preserving order.
    pub fn filter(&self, mut predicate: impl FnMut(&MeasurementRecord) -> bool) -> RecordSet {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Consume the set, returning the ordered records.
    pub fn into_vec(self) -> Vec<MeasurementRecord> {
        self.records
    }
}

impl From<Vec<MeasurementRecord>> for RecordSet {
    fn from(records: Vec<MeasurementRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<RecordSet> for Vec<MeasurementRecord> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

impl FromIterator<MeasurementRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = MeasurementRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a MeasurementRecord;
    type IntoIter = std::slice::Iter<'a, MeasurementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for RecordSet {
    type Item = MeasurementRecord;
    type IntoIter = std::vec::IntoIter<MeasurementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
