//! # Statistics Aggregator
//!
//! Summary statistics per metric over a subset of records. Values are
//! taken as recorded; implausible values are not filtered here.

use std::collections::BTreeMap;

use bbm_core::{MeasurementRecord, Metric};
use serde::Serialize;

use crate::percentile::percentile;

/// Summary of one metric.
///
/// For an empty subset `count` is 0 and every other field is `None`
/// (serialized as `null`), never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Number of values summarized.
    pub count: usize,
    /// Arithmetic mean; `None` for an empty input, as are all fields below.
    pub mean: Option<f64>,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
    /// Median, linearly interpolated.
    pub p50: Option<f64>,
    /// 90th percentile, linearly interpolated.
    pub p90: Option<f64>,
    /// 95th percentile, linearly interpolated.
    pub p95: Option<f64>,
}

impl MetricSummary {
    /// Summarize raw values in any order.
    pub fn from_values(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let sum: f64 = values.iter().sum();
        Self {
            count,
            mean: Some(sum / count as f64),
            min: values.first().copied(),
            max: values.last().copied(),
            p50: percentile(&values, 0.50),
            p90: percentile(&values, 0.90),
            p95: percentile(&values, 0.95),
        }
    }
}

/// Per-metric summaries, keyed by metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Statistics {
    metrics: BTreeMap<Metric, MetricSummary>,
}

impl Statistics {
    /// Summary for a metric, if it was requested.
    pub fn get(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.get(&metric)
    }

    /// Iterate summaries in metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricSummary)> {
        self.metrics.iter().map(|(m, s)| (*m, s))
    }

    /// Number of metrics summarized.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no metric was requested.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Compute statistics for `metrics` over `records`.
///
/// Duplicate entries in `metrics` are summarized once.
pub fn compute<'a>(
    records: impl IntoIterator<Item = &'a MeasurementRecord>,
    metrics: &[Metric],
) -> Statistics {
    let records: Vec<&MeasurementRecord> = records.into_iter().collect();
    let metrics = metrics
        .iter()
        .map(|&metric| {
            let values = records.iter().map(|r| metric.value_of(r)).collect();
            (metric, MetricSummary::from_values(values))
        })
        .collect();
    tracing::debug!(records = records.len(), "computed statistics");
    Statistics { metrics }
}
