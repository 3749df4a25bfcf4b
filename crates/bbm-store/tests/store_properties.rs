//! Property tests for store ingestion: idempotence, ordering, and
//! later-wins replacement under arbitrary batches.

use bbm_core::{MeasuredAt, MeasurementRecord, TestId};
use bbm_store::RecordStore;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn record(minutes: i64, id: u8, download: f64) -> MeasurementRecord {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    MeasurementRecord::new(
        MeasuredAt::new(base + Duration::minutes(minutes)),
        TestId::new(&format!("id-{id}")).unwrap(),
        download,
        10.0,
        20,
    )
}

fn batch() -> impl Strategy<Value = Vec<MeasurementRecord>> {
    prop::collection::vec((0i64..20_000, 0u8..4, 0.0f64..1000.0), 0..60)
        .prop_map(|rows| rows.into_iter().map(|(m, id, d)| record(m, id, d)).collect())
}

proptest! {
    #[test]
    fn ingesting_twice_is_idempotent(records in batch()) {
        let store = RecordStore::new();
        store.ingest(records.clone());
        let once = store.all();
        let second = store.ingest(records);
        prop_assert_eq!(store.all(), once);
        prop_assert_eq!(second.inserted, 0);
    }

    #[test]
    fn snapshot_is_ordered_and_unique(records in batch()) {
        let store = RecordStore::new();
        store.ingest(records);
        let all = store.all();
        for pair in all.as_slice().windows(2) {
            prop_assert!(pair[0].key() < pair[1].key());
        }
    }

    #[test]
    fn latest_duplicate_survives(records in batch(), replacement in 1000.0f64..2000.0) {
        prop_assume!(!records.is_empty());
        let store = RecordStore::new();
        store.ingest(records.clone());
        let mut updated = records[0].clone();
        updated.download_mbps = replacement;
        let summary = store.ingest(vec![updated.clone()]);
        prop_assert_eq!(summary.replaced, 1);
        prop_assert_eq!(store.get(&updated.key()), Some(updated));
    }

    #[test]
    fn split_batches_match_single_batch(records in batch(), split in 0usize..60) {
        let split = split.min(records.len());
        let whole = RecordStore::new();
        whole.ingest(records.clone());
        let parts = RecordStore::new();
        parts.ingest(records[..split].to_vec());
        parts.ingest(records[split..].to_vec());
        prop_assert_eq!(whole.all(), parts.all());
    }
}
