//! Persisted data model: pause records and the application state blob.
//!
//! Field names serialize in camelCase so the blob keeps the shape
//! earlier releases stored under `mindPause_appState`.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::JalaliDate;
use crate::clock::day_bounds;

/// How a pause session concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseOutcome {
    /// The full duration elapsed.
    Completed,
    /// The user left before the duration elapsed.
    ExitedEarly,
}

impl PauseOutcome {
    /// Map the `(completed, exited_early)` flag pair. Exactly one must be set.
    pub fn from_flags(completed: bool, exited_early: bool) -> Option<Self> {
        match (completed, exited_early) {
            (true, false) => Some(PauseOutcome::Completed),
            (false, true) => Some(PauseOutcome::ExitedEarly),
            _ => None,
        }
    }
}

/// Lifecycle position of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Active,
    Concluded,
}

/// One attempt to resist an urge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseRecord {
    pub id: String,
    /// Decision text as it was when the pause started.
    pub decision: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub exited_early: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jalali_date: Option<JalaliDate>,
}

impl PauseRecord {
    /// A fresh, in-progress record started at `start` (local time).
    pub fn start(id: String, decision: String, start: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            decision,
            start_time: start.with_timezone(&Utc),
            end_time: None,
            completed: false,
            exited_early: false,
            jalali_date: JalaliDate::from_gregorian(start.date_naive()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn state(&self) -> SessionState {
        if self.is_active() {
            SessionState::Active
        } else {
            SessionState::Concluded
        }
    }

    pub fn outcome(&self) -> Option<PauseOutcome> {
        self.end_time?;
        PauseOutcome::from_flags(self.completed, self.exited_early)
    }

    /// Concluded and not abandoned.
    pub fn is_success(&self) -> bool {
        self.end_time.is_some() && !self.exited_early
    }

    /// Seconds between start and end, if concluded.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end_time.map(|end| (end - self.start_time).num_seconds())
    }

    /// Move to `Concluded`. `end_time` is clamped to `start_time`.
    pub(crate) fn conclude(&mut self, outcome: PauseOutcome, now: DateTime<Utc>) {
        self.end_time = Some(now.max(self.start_time));
        self.completed = outcome == PauseOutcome::Completed;
        self.exited_early = outcome == PauseOutcome::ExitedEarly;
    }
}

/// The whole persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(rename = "currentDecision", default)]
    pub decision: Option<String>,
    #[serde(rename = "hasSetDecision", default)]
    pub has_decision: bool,
    #[serde(default)]
    pub pause_records: Vec<PauseRecord>,
    /// Advisory on disk; always recomputed from `pause_records`.
    #[serde(default)]
    pub today_attempts: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub habits: Vec<Habit>,
}

/// A habit being given up, with a hand-kept count of days without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Days the user has marked as clean since the last reset.
    pub days_without: u32,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jalali_start: Option<JalaliDate>,
}

impl Habit {
    pub fn new(id: String, name: String, start: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            name,
            days_without: 0,
            start_time: start.with_timezone(&Utc),
            jalali_start: JalaliDate::from_gregorian(start.date_naive()),
        }
    }

    /// Start over from `now`.
    pub(crate) fn restart(&mut self, now: DateTime<FixedOffset>) {
        self.days_without = 0;
        self.start_time = now.with_timezone(&Utc);
        self.jalali_start = JalaliDate::from_gregorian(now.date_naive());
    }

    /// Whole local calendar days since the (re)start.
    pub fn days_since_start(&self, now: DateTime<FixedOffset>) -> i64 {
        let started = self.start_time.with_timezone(now.offset()).date_naive();
        (now.date_naive() - started).num_days().max(0)
    }
}

impl AppState {
    pub fn find(&self, id: &str) -> Option<&PauseRecord> {
        self.pause_records.iter().find(|r| r.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut PauseRecord> {
        self.pause_records.iter_mut().find(|r| r.id == id)
    }

    pub fn find_habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub(crate) fn find_habit_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    /// Most recently started record that has not concluded.
    pub fn active_record(&self) -> Option<&PauseRecord> {
        self.pause_records.iter().rev().find(|r| r.is_active())
    }

    /// Refresh the cached `today_attempts` and return it.
    pub fn recompute_today_attempts(&mut self, now: DateTime<FixedOffset>) -> usize {
        self.today_attempts = count_today(&self.pause_records, now);
        self.today_attempts
    }

    /// Repair fields older blobs may carry inconsistently.
    ///
    /// Missing Jalali tags are derived from `start_time` in `now`'s offset;
    /// tags that exist are left alone.
    pub(crate) fn normalize(&mut self, now: DateTime<FixedOffset>) {
        self.decision = self
            .decision
            .take()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.has_decision = self.decision.is_some();

        let offset = *now.offset();
        for record in &mut self.pause_records {
            if record.jalali_date.is_none() {
                let local = record.start_time.with_timezone(&offset);
                record.jalali_date = JalaliDate::from_gregorian(local.date_naive());
            }
        }
        self.recompute_today_attempts(now);
    }
}

/// Records whose start falls in `[today 00:00, tomorrow 00:00)` local time.
pub fn count_today(records: &[PauseRecord], now: DateTime<FixedOffset>) -> usize {
    let (start, end) = day_bounds(now);
    records
        .iter()
        .filter(|r| r.start_time >= start && r.start_time < end)
        .count()
}
