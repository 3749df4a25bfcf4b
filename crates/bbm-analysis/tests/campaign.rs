//! Cross-module properties: selection output stays ordered, statistics
//! agree with the selected subset, and protocol campaigns respect their
//! rules whenever one is found.

use bbm_analysis::{
    compute, group_by_day, select, select_protocol_campaign, spacing_warnings, ProtocolRules,
    Selection,
};
use bbm_core::{MeasuredAt, MeasurementRecord, Metric, RecordSet, TestId};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn records_from(offsets: Vec<(i64, f64)>) -> RecordSet {
    let base = NaiveDate::from_ymd_opt(2024, 9, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap();
    offsets
        .into_iter()
        .enumerate()
        .map(|(i, (minutes, download))| {
            MeasurementRecord::new(
                MeasuredAt::new(base + Duration::minutes(minutes)),
                TestId::new(&format!("m{i}")).unwrap(),
                download,
                download / 4.0,
                20,
            )
        })
        .collect()
}

fn dataset() -> impl Strategy<Value = RecordSet> {
    // up to three weeks, one measurement at most every few minutes
    prop::collection::vec((0i64..30_240, 1.0f64..500.0), 0..400).prop_map(records_from)
}

proptest! {
    #[test]
    fn date_range_selection_is_ordered_subset(data in dataset(), from in 0i64..21, len in 0i64..21) {
        let start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap() + Duration::days(from);
        let sel = Selection::DateRange { from: start, to: start + Duration::days(len) };
        let subset = select(&data, &sel);
        prop_assert!(subset.len() <= data.len());
        for pair in subset.as_slice().windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        prop_assert!(subset.iter().all(|r| r.date() >= start && r.date() <= start + Duration::days(len)));
    }

    #[test]
    fn count_matches_subset(data in dataset()) {
        let stats = compute(&data, Metric::all());
        for (_, summary) in stats.iter() {
            prop_assert_eq!(summary.count, data.len());
            if let (Some(min), Some(p50), Some(max)) = (summary.min, summary.p50, summary.max) {
                prop_assert!(min <= p50 && p50 <= max);
            }
        }
    }

    #[test]
    fn protocol_campaign_obeys_rules(data in dataset()) {
        let rules = ProtocolRules::default();
        if let Some(campaign) = select_protocol_campaign(&data, &rules) {
            prop_assert_eq!(campaign.len(), rules.campaign_size());
            let days: Vec<NaiveDate> = group_by_day(&campaign).into_keys().collect();
            prop_assert_eq!(days.len(), rules.days);
            prop_assert!((days[days.len() - 1] - days[0]).num_days() <= rules.max_span_days);
            for pair in days.windows(2) {
                prop_assert!((pair[1] - pair[0]).num_days() >= rules.min_day_gap);
            }
            prop_assert!(spacing_warnings(&campaign, &rules).is_empty());
        }
    }
}

#[test]
fn dense_three_weeks_yield_a_campaign() {
    // every 20 minutes around the clock for 21 days
    let offsets = (0..21 * 72).map(|i| (i * 20, 100.0)).collect();
    let data = records_from(offsets);
    let campaign = select_protocol_campaign(&data, &ProtocolRules::default()).unwrap();
    assert_eq!(campaign.len(), 30);
    let days: Vec<NaiveDate> = group_by_day(&campaign).into_keys().collect();
    assert_eq!(
        days,
        vec![
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 5).unwrap(),
        ]
    );
}
