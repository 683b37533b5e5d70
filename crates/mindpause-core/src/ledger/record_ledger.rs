//! The attempt ledger: single owner of the decision and all pause records.
//!
//! Every mutation runs under one lock: the current state is cloned, the
//! change is applied to the clone, the clone is written to the store, and
//! only then does it replace the in-memory state. A failed write leaves
//! memory exactly as it was, and two overlapping callers can never both
//! start from the same stale state.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use super::model::{AppState, Habit, PauseRecord};
use crate::clock::Clock;
use crate::error::{CoreError, PersistenceError, Result, ValidationError};
use crate::storage::{StateStore, STATE_KEY};

/// Result of a change applied to the draft state.
pub(crate) enum Mutation<T> {
    /// Draft differs from the current state and must be persisted.
    Changed(T),
    /// Nothing to write.
    Unchanged(T),
}

pub struct RecordLedger {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    key: String,
    state: Mutex<AppState>,
}

impl std::fmt::Debug for RecordLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLedger")
            .field("key", &self.key)
            .field("state", &*self.lock())
            .finish()
    }
}

impl RecordLedger {
    /// Load the ledger stored under the default key.
    ///
    /// # Errors
    /// Returns `Persistence` if the store cannot be read or the stored blob
    /// is not valid; the blob is left untouched in that case.
    pub fn open(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::open_with_key(store, clock, STATE_KEY)
    }

    pub fn open_with_key(
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();
        let state = load_state(store.as_ref(), &key, clock.now())?;
        debug!(
            key = %key,
            records = state.pause_records.len(),
            today = state.today_attempts,
            "ledger loaded"
        );
        Ok(Self {
            store,
            clock,
            key,
            state: Mutex::new(state),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    pub fn decision(&self) -> Option<String> {
        self.lock().decision.clone()
    }

    pub fn has_decision(&self) -> bool {
        self.lock().has_decision
    }

    pub fn records(&self) -> Vec<PauseRecord> {
        self.lock().pause_records.clone()
    }

    pub fn record(&self, id: &str) -> Option<PauseRecord> {
        self.lock().find(id).cloned()
    }

    pub fn active_record(&self) -> Option<PauseRecord> {
        self.lock().active_record().cloned()
    }

    pub fn habits(&self) -> Vec<Habit> {
        self.lock().habits.clone()
    }

    pub fn habit(&self, id: &str) -> Option<Habit> {
        self.lock().find_habit(id).cloned()
    }

    /// Cached count as of the last load or mutation.
    pub fn today_attempts(&self) -> usize {
        self.lock().today_attempts
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Recount today's attempts against the current clock.
    ///
    /// Only the in-memory cache changes; the stored count is advisory and
    /// is refreshed by the next mutation.
    pub fn recompute_today_attempts(&self) -> usize {
        let now = self.clock.now();
        self.lock().recompute_today_attempts(now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record the initial decision.
    ///
    /// # Errors
    /// `Validation` when `text` is blank, `Persistence` when the write fails.
    pub fn set_decision(&self, text: &str) -> Result<()> {
        self.write_decision(text)?;
        info!("decision set");
        Ok(())
    }

    /// Edit an existing decision. Same validation as [`set_decision`].
    ///
    /// [`set_decision`]: RecordLedger::set_decision
    pub fn update_decision(&self, text: &str) -> Result<()> {
        self.write_decision(text)?;
        info!("decision updated");
        Ok(())
    }

    /// Unset the decision. Records are kept.
    pub fn reset_decision(&self) -> Result<()> {
        self.mutate(|state, _| {
            if !state.has_decision && state.decision.is_none() {
                return Ok(Mutation::Unchanged(()));
            }
            state.decision = None;
            state.has_decision = false;
            Ok(Mutation::Changed(()))
        })?;
        info!("decision reset");
        Ok(())
    }

    /// Erase the stored blob and every record. Irreversible and
    /// unconditional; confirmation is the caller's job.
    pub fn clear_all_data(&self) -> Result<()> {
        let mut guard = self.lock();
        self.store.remove(&self.key).map_err(|e| {
            warn!(error = %e, "failed to clear stored state");
            e
        })?;
        let discarded = guard.pause_records.len();
        *guard = AppState::default();
        info!(discarded, "all data cleared");
        Ok(())
    }

    /// Start tracking a habit under `name`.
    ///
    /// # Errors
    /// `Validation` when `name` is blank, `Persistence` when the write fails.
    pub fn add_habit(&self, name: &str) -> Result<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyHabitName.into());
        }
        let habit = self.mutate(|state, now| {
            let id = next_id(state.habits.iter().map(|h| h.id.as_str()), now);
            let habit = Habit::new(id, name.to_string(), now);
            state.habits.push(habit.clone());
            Ok(Mutation::Changed(habit))
        })?;
        info!(id = %habit.id, "habit added");
        Ok(habit)
    }

    /// Count one more day without the habit.
    pub fn mark_habit_day(&self, id: &str) -> Result<Habit> {
        self.change_habit(id, |habit, _| habit.days_without = habit.days_without.saturating_add(1))
    }

    /// Back to zero days, starting now.
    pub fn reset_habit(&self, id: &str) -> Result<Habit> {
        let habit = self.change_habit(id, |habit, now| habit.restart(now))?;
        info!(id, "habit reset");
        Ok(habit)
    }

    pub fn remove_habit(&self, id: &str) -> Result<()> {
        self.mutate(|state, _| {
            let before = state.habits.len();
            state.habits.retain(|h| h.id != id);
            if state.habits.len() == before {
                return Err(CoreError::HabitNotFound { id: id.to_string() });
            }
            Ok(Mutation::Changed(()))
        })?;
        info!(id, "habit removed");
        Ok(())
    }

    fn change_habit(
        &self,
        id: &str,
        change: impl FnOnce(&mut Habit, DateTime<FixedOffset>),
    ) -> Result<Habit> {
        self.mutate(|state, now| {
            let habit = state
                .find_habit_mut(id)
                .ok_or_else(|| CoreError::HabitNotFound { id: id.to_string() })?;
            change(habit, now);
            Ok(Mutation::Changed(habit.clone()))
        })
    }

    fn write_decision(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyDecision.into());
        }
        self.mutate(|state, _| {
            if state.has_decision && state.decision.as_deref() == Some(text) {
                return Ok(Mutation::Unchanged(()));
            }
            state.decision = Some(text.to_string());
            state.has_decision = true;
            Ok(Mutation::Changed(()))
        })
    }

    /// Apply `change` to a draft, persist it, then publish it.
    ///
    /// The lock is held for the whole read-modify-write so concurrent
    /// callers are serialized.
    pub(crate) fn mutate<T>(
        &self,
        change: impl FnOnce(&mut AppState, DateTime<FixedOffset>) -> Result<Mutation<T>>,
    ) -> Result<T> {
        let mut guard = self.lock();
        let now = self.clock.now();
        let mut draft = guard.clone();

        let value = match change(&mut draft, now)? {
            Mutation::Unchanged(value) => {
                guard.recompute_today_attempts(now);
                return Ok(value);
            }
            Mutation::Changed(value) => value,
        };

        draft.recompute_today_attempts(now);
        self.persist(&draft).map_err(|e| {
            warn!(error = %e, "persist failed; in-memory state unchanged");
            e
        })?;
        *guard = draft;
        Ok(value)
    }

    fn persist(&self, state: &AppState) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(state)?;
        self.store.set(&self.key, &blob)
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        // Drafts are only published after a successful write, so the state
        // behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_state(store: &dyn StateStore, key: &str, now: DateTime<FixedOffset>) -> Result<AppState> {
    let mut state = match store.get(key)? {
        Some(blob) => serde_json::from_str::<AppState>(&blob).map_err(|e| {
            warn!(key, error = %e, "stored state is unreadable");
            CoreError::from(e)
        })?,
        None => AppState::default(),
    };
    state.normalize(now);
    Ok(state)
}

/// A time-based id strictly greater than every numeric record id in `state`.
pub(crate) fn next_record_id(state: &AppState, now: DateTime<FixedOffset>) -> String {
    next_id(state.pause_records.iter().map(|r| r.id.as_str()), now)
}

fn next_id<'a>(existing: impl Iterator<Item = &'a str>, now: DateTime<FixedOffset>) -> String {
    let candidate = now.timestamp_millis().max(0) as u64;
    let highest = existing.filter_map(|id| id.parse::<u64>().ok()).max();
    match highest {
        Some(h) if candidate <= h => (h + 1).to_string(),
        _ => candidate.to_string(),
    }
}
