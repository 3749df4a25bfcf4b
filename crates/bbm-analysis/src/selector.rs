//! # Campaign Selector
//!
//! Picks the subset of records a statistic or verdict is computed over.
//! Output is always a [`RecordSet`] in timestamp order.

use std::collections::{BTreeMap, BTreeSet};

use bbm_core::{MeasuredAt, MeasurementRecord, RecordKey, RecordSet, TestId};
use chrono::{Duration, NaiveDate};

/// Which records to include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every record.
    All,
    /// Exactly these keys.
    Keys(BTreeSet<RecordKey>),
    /// Records with any of these test ids.
    TestIds(BTreeSet<TestId>),
    /// Records whose calendar date lies in `from..=to`.
    DateRange { from: NaiveDate, to: NaiveDate },
    /// Records taken at or after `now - days`. A cutoff before the
    /// earliest representable timestamp selects everything.
    LastDays { days: u32, now: MeasuredAt },
}

impl Selection {
    /// Whether `record` belongs to this selection.
    pub fn matches(&self, record: &MeasurementRecord) -> bool {
        match self {
            Self::All => true,
            Self::Keys(keys) => keys.contains(&record.key()),
            Self::TestIds(ids) => ids.contains(&record.test_id),
            Self::DateRange { from, to } => (*from..=*to).contains(&record.date()),
            Self::LastDays { days, now } => {
                let cutoff = Duration::try_days(i64::from(*days))
                    .and_then(|span| now.as_datetime().checked_sub_signed(span));
                match cutoff {
                    Some(cutoff) => *record.timestamp.as_datetime() >= cutoff,
                    None => true,
                }
            }
        }
    }
}

/// Records matching `selection`, in timestamp order.
pub fn select(records: &RecordSet, selection: &Selection) -> RecordSet {
    if matches!(selection, Selection::All) {
        return records.clone();
    }
    records.filter(|r| selection.matches(r))
}

/// Records matching every selection in `selections`.
///
/// An empty slice selects everything.
pub fn select_all(records: &RecordSet, selections: &[Selection]) -> RecordSet {
    records.filter(|r| selections.iter().all(|s| s.matches(r)))
}

/// Group records by calendar date.
pub fn group_by_day(records: &RecordSet) -> BTreeMap<NaiveDate, RecordSet> {
    let mut days: BTreeMap<NaiveDate, Vec<MeasurementRecord>> = BTreeMap::new();
    for record in records {
        days.entry(record.date()).or_default().push(record.clone());
    }
    days.into_iter()
        .map(|(day, records)| (day, RecordSet::from_records(records)))
        .collect()
}
