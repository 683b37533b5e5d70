//! Day streaks: runs of consecutive local days with at least one success.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::ledger::PauseRecord;

/// Local calendar days (in `offset`) on which some pause succeeded.
pub fn success_days(records: &[PauseRecord], offset: FixedOffset) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.is_success())
        .map(|r| r.start_time.with_timezone(&offset).date_naive())
        .collect()
}

/// Length of the streak that is still alive at `now`.
///
/// A streak stays alive through today even before today's first success,
/// so it counts back from today, or from yesterday when today has none yet.
pub fn current_streak(records: &[PauseRecord], now: DateTime<FixedOffset>) -> u32 {
    let days = success_days(records, *now.offset());
    let today = now.date_naive();

    let mut day = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive success days ever recorded.
pub fn longest_streak(records: &[PauseRecord], offset: FixedOffset) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in success_days(records, offset) {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}
