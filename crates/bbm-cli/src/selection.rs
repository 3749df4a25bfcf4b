//! Record selection flags shared by `stats` and `check`.

use std::collections::BTreeSet;

use anyhow::Result;
use bbm_analysis::Selection;
use bbm_core::{MeasuredAt, TestId};
use chrono::NaiveDate;
use clap::Args;

/// Flags narrowing the records a command works on. All given flags apply
/// together.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// First calendar day to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last calendar day to include (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Only records from the last N days.
    #[arg(long, value_name = "DAYS")]
    pub last_days: Option<u32>,

    /// Only records with this test id. Repeatable.
    #[arg(long = "test-id", value_name = "ID")]
    pub test_ids: Vec<String>,
}

impl SelectionArgs {
    /// Translate flags into selections, using `now` for `--last-days`.
    ///
    /// # Errors
    ///
    /// Fails on a blank `--test-id`.
    pub fn selections(&self, now: MeasuredAt) -> Result<Vec<Selection>> {
        let mut selections = Vec::new();
        if self.from.is_some() || self.to.is_some() {
            selections.push(Selection::DateRange {
                from: self.from.unwrap_or(NaiveDate::MIN),
                to: self.to.unwrap_or(NaiveDate::MAX),
            });
        }
        if let Some(days) = self.last_days {
            selections.push(Selection::LastDays { days, now });
        }
        if !self.test_ids.is_empty() {
            let ids = self
                .test_ids
                .iter()
                .map(|id| TestId::new(id))
                .collect::<Result<BTreeSet<_>, _>>()?;
            selections.push(Selection::TestIds(ids));
        }
        Ok(selections)
    }
}

/// The current local wall-clock time, matching the export's timestamps.
pub fn local_now() -> MeasuredAt {
    MeasuredAt::new(chrono::Local::now().naive_local())
}
