//! Time source for the ledger and session controller.
//!
//! Timestamps carry the user's local offset so "today" and calendar tags
//! are computed in local time. Tests inject a [`FixedClock`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, TimeZone};

pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the machine's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Build a clock at a local wall time in the given offset.
    ///
    /// Returns `None` for an out-of-range date or time.
    pub fn at(
        offset_secs: i32,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        let offset = FixedOffset::east_opt(offset_secs)?;
        let now = offset
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()?;
        Some(Self::new(now))
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<FixedOffset>> {
        // A poisoned clock only ever held a plain timestamp.
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.lock()
    }
}

/// `[local midnight of now, next local midnight)` in `now`'s offset.
///
/// The offset of `now` is assumed to hold for the whole day. On a day with
/// a DST change the window is a fixed 24 hours and its edges can be an
/// hour away from the wall-clock midnights.
pub fn day_bounds(now: DateTime<FixedOffset>) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = now
        .offset()
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or(now);
    (start, start + Duration::days(1))
}
