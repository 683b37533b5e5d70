//! Pause countdown.
//!
//! A wall-clock-based state machine for one pause. It does not use internal
//! threads - the host calls `tick()` periodically and feeds it the time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Completed | Exited)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut countdown = PauseCountdown::new(record_id, 60, default_messages());
//! countdown.start(clock.now());
//! // In a loop:
//! for event in countdown.tick(clock.now()) { /* render, conclude */ }
//! ```
//!
//! Ticks may arrive late or in bursts; elapsed time is recomputed from the
//! start instant, every message checkpoint is reported once and in order,
//! and completion is reported exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::messages::{message_at, MotivationalMessage};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Completed,
    Exited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseCountdown {
    record_id: String,
    duration_secs: u64,
    messages: Vec<MotivationalMessage>,
    state: CountdownState,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    /// Checkpoint of the last message reported, if any.
    #[serde(default)]
    last_shown_at_secs: Option<u64>,
}

impl PauseCountdown {
    pub fn new(
        record_id: impl Into<String>,
        duration_secs: u64,
        mut messages: Vec<MotivationalMessage>,
    ) -> Self {
        messages.sort_by_key(|m| m.show_at_secs);
        Self {
            record_id: record_id.into(),
            duration_secs,
            messages,
            state: CountdownState::Idle,
            started_at: None,
            last_shown_at_secs: None,
        }
    }

    /// Rebuild a running countdown for a pause that began at `started_at`,
    /// e.g. one started by another process. Checkpoints already passed are
    /// reported again by the next `tick()`.
    pub fn resume(
        record_id: impl Into<String>,
        duration_secs: u64,
        messages: Vec<MotivationalMessage>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut countdown = Self::new(record_id, duration_secs, messages);
        countdown.state = CountdownState::Running;
        countdown.started_at = Some(started_at);
        countdown
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Whole seconds since start, capped at the duration.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at {
            Some(start) => {
                let elapsed = (now - start).num_seconds().max(0) as u64;
                elapsed.min(self.duration_secs)
            }
            None => 0,
        }
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.state {
            CountdownState::Idle => self.duration_secs,
            CountdownState::Completed => 0,
            _ => self.duration_secs - self.elapsed_secs(now),
        }
    }

    pub fn current_message(&self, now: DateTime<Utc>) -> Option<&MotivationalMessage> {
        if self.state == CountdownState::Idle {
            return None;
        }
        message_at(&self.messages, self.elapsed_secs(now))
    }

    /// When the countdown will (or did) run out. `None` before start or
    /// when the duration does not fit a timestamp.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.duration_secs).ok()?;
        self.started_at?.checked_add_signed(Duration::try_seconds(secs)?)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            record_id: self.record_id.clone(),
            state: self.state,
            remaining_secs: self.remaining_secs(now),
            total_secs: self.duration_secs,
            message: self.current_message(now).map(|m| m.text.clone()),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting. The first checkpoint message is reported by the
    /// first `tick()`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            CountdownState::Idle => {
                self.state = CountdownState::Running;
                self.started_at = Some(now);
                Some(Event::PauseStarted {
                    record_id: self.record_id.clone(),
                    duration_secs: self.duration_secs,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Call periodically. Returns newly reached checkpoints, then
    /// `PauseCompleted` once the duration has elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.state != CountdownState::Running {
            return Vec::new();
        }

        let elapsed = self.elapsed_secs(now);
        let mut events: Vec<Event> = self
            .messages
            .iter()
            .filter(|m| m.show_at_secs <= elapsed)
            .filter(|m| self.last_shown_at_secs.map_or(true, |last| m.show_at_secs > last))
            .map(|m| Event::MessageShown {
                record_id: self.record_id.clone(),
                message_id: m.id,
                text: m.text.clone(),
                show_at_secs: m.show_at_secs,
                at: now,
            })
            .collect();
        if let Some(Event::MessageShown { show_at_secs, .. }) = events.last() {
            self.last_shown_at_secs = Some(*show_at_secs);
        }

        if elapsed >= self.duration_secs {
            self.state = CountdownState::Completed;
            events.push(Event::PauseCompleted {
                record_id: self.record_id.clone(),
                at: now,
            });
        }
        events
    }

    /// Leave before the end. If the duration has already run out this
    /// completes instead, so a late abort never turns a success into an exit.
    pub fn exit_early(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }

        let elapsed = self.elapsed_secs(now);
        if elapsed >= self.duration_secs {
            self.state = CountdownState::Completed;
            return Some(Event::PauseCompleted {
                record_id: self.record_id.clone(),
                at: now,
            });
        }

        self.state = CountdownState::Exited;
        Some(Event::PauseExited {
            record_id: self.record_id.clone(),
            elapsed_secs: elapsed,
            at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::messages::default_messages;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn running() -> PauseCountdown {
        let mut countdown = PauseCountdown::new("r1", 60, default_messages());
        assert!(countdown.start(t0()).is_some());
        countdown
    }

    fn shown_ids(events: &[Event]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::MessageShown { message_id, .. } => Some(*message_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_only_from_idle() {
        let mut countdown = running();
        assert_eq!(countdown.state(), CountdownState::Running);
        assert!(countdown.start(at(5)).is_none());
    }

    #[test]
    fn messages_rotate_at_checkpoints() {
        let mut countdown = running();
        assert_eq!(shown_ids(&countdown.tick(at(0))), vec![1]);
        assert!(countdown.tick(at(1)).is_empty());
        assert!(countdown.tick(at(19)).is_empty());
        assert_eq!(shown_ids(&countdown.tick(at(20))), vec![2]);
        assert_eq!(shown_ids(&countdown.tick(at(41))), vec![3]);
        assert_eq!(countdown.current_message(at(41)).map(|m| m.id), Some(3));
        assert_eq!(countdown.remaining_secs(at(41)), 19);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut countdown = running();
        for s in 0..60 {
            assert!(!countdown.tick(at(s)).iter().any(Event::is_terminal));
        }
        let events = countdown.tick(at(60));
        assert!(matches!(events.last(), Some(Event::PauseCompleted { .. })));
        assert_eq!(countdown.state(), CountdownState::Completed);
        assert!(countdown.tick(at(61)).is_empty());
        assert!(countdown.exit_early(at(62)).is_none());
    }

    #[test]
    fn batched_ticks_report_every_checkpoint_then_complete() {
        let mut countdown = running();
        let events = countdown.tick(at(90));
        assert_eq!(shown_ids(&events), vec![1, 2, 3]);
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert!(countdown.tick(at(120)).is_empty());
    }

    #[test]
    fn exit_early_records_elapsed() {
        let mut countdown = running();
        countdown.tick(at(0));
        match countdown.exit_early(at(12)) {
            Some(Event::PauseExited { elapsed_secs, record_id, .. }) => {
                assert_eq!(elapsed_secs, 12);
                assert_eq!(record_id, "r1");
            }
            other => panic!("Expected PauseExited, got {other:?}"),
        }
        assert_eq!(countdown.state(), CountdownState::Exited);
        assert!(countdown.tick(at(70)).is_empty());
    }

    #[test]
    fn late_exit_completes_instead() {
        let mut countdown = running();
        assert!(matches!(
            countdown.exit_early(at(75)),
            Some(Event::PauseCompleted { .. })
        ));
        assert_eq!(countdown.state(), CountdownState::Completed);
    }

    #[test]
    fn idle_countdown_does_nothing() {
        let mut countdown = PauseCountdown::new("r1", 60, default_messages());
        assert!(countdown.tick(at(100)).is_empty());
        assert!(countdown.exit_early(at(100)).is_none());
        assert_eq!(countdown.remaining_secs(at(100)), 60);
        assert!(countdown.current_message(at(100)).is_none());
        assert!(countdown.deadline().is_none());
    }

    #[test]
    fn clock_going_backwards_is_zero_elapsed() {
        let countdown = running();
        assert_eq!(countdown.elapsed_secs(at(-30)), 0);
        assert_eq!(countdown.remaining_secs(at(-30)), 60);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let countdown = running();
        match countdown.snapshot(at(25)) {
            Event::StateSnapshot {
                state,
                remaining_secs,
                total_secs,
                message,
                ..
            } => {
                assert_eq!(state, CountdownState::Running);
                assert_eq!(remaining_secs, 35);
                assert_eq!(total_secs, 60);
                assert_eq!(message.as_deref(), Some("Your mind is not helping right now"));
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn unsorted_messages_are_ordered() {
        let messages = vec![
            MotivationalMessage::new(2, "b", 10),
            MotivationalMessage::new(1, "a", 0),
        ];
        let mut countdown = PauseCountdown::new("r", 30, messages);
        countdown.start(t0());
        assert_eq!(shown_ids(&countdown.tick(at(15))), vec![1, 2]);
        assert_eq!(countdown.deadline(), Some(at(30)));
    }

    #[test]
    fn resumed_countdown_picks_up_remaining_time() {
        let mut countdown = PauseCountdown::resume("r1", 60, default_messages(), t0());
        assert_eq!(countdown.state(), CountdownState::Running);
        assert_eq!(countdown.remaining_secs(at(45)), 15);
        assert!(countdown.start(at(45)).is_none());
        assert_eq!(shown_ids(&countdown.tick(at(45))), vec![1, 2, 3]);
        assert!(countdown.tick(at(61)).iter().any(Event::is_terminal));
    }

    #[test]
    fn oversized_duration_has_no_deadline() {
        let mut countdown = PauseCountdown::new("r1", u64::MAX, default_messages());
        assert_eq!(countdown.deadline(), None);
        countdown.start(t0());
        assert_eq!(countdown.deadline(), None);
        assert_eq!(countdown.remaining_secs(at(10)), u64::MAX - 10);

        let mut countdown = PauseCountdown::new("r2", 10_000_000_000_000_000, default_messages());
        countdown.start(t0());
        assert_eq!(countdown.deadline(), None);
        assert!(countdown.tick(at(60)).iter().all(|e| !e.is_terminal()));
    }
}
