//! Statistics over the pause ledger.
//!
//! Everything here is a pure function of the record list plus the current
//! local time, so callers can feed it a ledger snapshot without holding
//! any lock.

mod period;
mod rates;
mod streak;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::ledger::{count_today, PauseRecord};

pub use period::{
    bucket_counts, filter_by_period, period_summary, records_in, Bucket, Period, PeriodMode,
    PeriodSummary,
};
pub use rates::{daily_average, success_failure_split, success_rate, SuccessFailure};
pub use streak::{current_streak, longest_streak, success_days};

/// Overall ledger figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_attempts: usize,
    pub today_attempts: usize,
    pub success: usize,
    pub failure: usize,
    pub success_rate: u32,
    pub daily_average: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

pub fn summarize(records: &[PauseRecord], now: DateTime<FixedOffset>) -> Summary {
    let split = success_failure_split(records);
    Summary {
        total_attempts: records.len(),
        today_attempts: count_today(records, now),
        success: split.success,
        failure: split.failure,
        success_rate: rates::percentage(split),
        daily_average: daily_average(records, now),
        current_streak: current_streak(records, now),
        longest_streak: longest_streak(records, *now.offset()),
    }
}
