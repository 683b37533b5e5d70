//! Success rates and averages over pause records.
//!
//! A pause counts as a success when it concluded (`end_time` set) and the
//! user did not exit early. `completed` and `exited_early` are separate
//! flags, so success is judged on `exited_early` alone.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::ledger::PauseRecord;

/// Successes versus everything else in a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessFailure {
    pub success: usize,
    /// Early exits and pauses still in progress.
    pub failure: usize,
}

impl SuccessFailure {
    pub fn total(&self) -> usize {
        self.success + self.failure
    }
}

pub fn success_failure_split<'a, I>(records: I) -> SuccessFailure
where
    I: IntoIterator<Item = &'a PauseRecord>,
{
    records
        .into_iter()
        .fold(SuccessFailure::default(), |mut acc, record| {
            if record.is_success() {
                acc.success += 1;
            } else {
                acc.failure += 1;
            }
            acc
        })
}

/// Percentage of successes, rounded. 0 for no records.
pub fn success_rate<'a, I>(records: I) -> u32
where
    I: IntoIterator<Item = &'a PauseRecord>,
{
    percentage(success_failure_split(records))
}

pub(crate) fn percentage(split: SuccessFailure) -> u32 {
    let total = split.total();
    if total == 0 {
        return 0;
    }
    (100.0 * split.success as f64 / total as f64).round() as u32
}

/// Attempts per day since the first record, to one decimal place.
///
/// Spans shorter than a day count as one day. 0 for no records.
pub fn daily_average(records: &[PauseRecord], now: DateTime<FixedOffset>) -> f64 {
    let Some(first) = records.first() else {
        return 0.0;
    };
    let days = (now.with_timezone(&chrono::Utc) - first.start_time)
        .num_days()
        .max(1);
    let average = records.len() as f64 / days as f64;
    (average * 10.0).round() / 10.0
}
