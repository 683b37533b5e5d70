//! Session controller: the lifecycle of one pause record.
//!
//! ```text
//! Idle -> Active -> Concluded
//! ```
//!
//! The controller owns no timer. A host-side countdown decides when a
//! pause ends and reports it through [`SessionController::complete_pause`].

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result, ValidationError};
use crate::ledger::{next_record_id, Mutation, PauseOutcome, PauseRecord, RecordLedger, SessionState};

use super::messages::PAUSE_DURATION_SECS;

#[derive(Debug, Clone)]
pub struct SessionController {
    ledger: Arc<RecordLedger>,
    duration_secs: u64,
}

impl SessionController {
    pub fn new(ledger: Arc<RecordLedger>) -> Self {
        Self::with_duration(ledger, PAUSE_DURATION_SECS)
    }

    pub fn with_duration(ledger: Arc<RecordLedger>, duration_secs: u64) -> Self {
        Self {
            ledger,
            duration_secs,
        }
    }

    pub fn ledger(&self) -> &RecordLedger {
        &self.ledger
    }

    /// Length the host countdown should run for.
    pub fn pause_duration(&self) -> u64 {
        self.duration_secs
    }

    /// State of the record with `id`.
    ///
    /// # Errors
    /// `NotFound` when `id` is unknown.
    pub fn session_state(&self, id: &str) -> Result<SessionState> {
        self.ledger
            .record(id)
            .map(|r| r.state())
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }

    /// `Idle` unless some record is still active.
    pub fn current_state(&self) -> SessionState {
        match self.ledger.active_record() {
            Some(_) => SessionState::Active,
            None => SessionState::Idle,
        }
    }

    /// Open a new pause and return its id.
    ///
    /// # Errors
    /// `Precondition` when no decision is set, `Persistence` when the
    /// write fails (no record is added in that case).
    pub fn start_pause(&self) -> Result<String> {
        let record = self.ledger.mutate(|state, now| {
            let decision = match (&state.decision, state.has_decision) {
                (Some(decision), true) => decision.clone(),
                _ => {
                    return Err(CoreError::Precondition(
                        "a decision must be set before starting a pause".into(),
                    ))
                }
            };
            if let Some(active) = state.active_record() {
                warn!(active = %active.id, "starting a pause while another is still active");
            }
            let id = next_record_id(state, now);
            let record = PauseRecord::start(id, decision, now);
            state.pause_records.push(record.clone());
            Ok(Mutation::Changed(record))
        })?;

        info!(id = %record.id, jalali = ?record.jalali_date, "pause started");
        Ok(record.id)
    }

    /// Conclude the record with `id`. Exactly one flag must be true.
    ///
    /// A record that has already concluded is returned as stored; the
    /// second call neither changes nor rewrites it.
    ///
    /// # Errors
    /// `Validation` for an invalid flag pair, `NotFound` for an unknown id,
    /// `Persistence` when the write fails.
    pub fn complete_pause(&self, id: &str, completed: bool, exited_early: bool) -> Result<PauseRecord> {
        let outcome = PauseOutcome::from_flags(completed, exited_early).ok_or(
            ValidationError::InvalidOutcome {
                completed,
                exited_early,
            },
        )?;
        self.finish(id, outcome)
    }

    /// Typed form of [`complete_pause`](Self::complete_pause).
    pub fn finish(&self, id: &str, outcome: PauseOutcome) -> Result<PauseRecord> {
        let (record, changed) = self.ledger.mutate(|state, now| {
            let record = state
                .find_mut(id)
                .ok_or_else(|| CoreError::NotFound { id: id.to_string() })?;
            if !record.is_active() {
                return Ok(Mutation::Unchanged((record.clone(), false)));
            }
            record.conclude(outcome, now.with_timezone(&Utc));
            Ok(Mutation::Changed((record.clone(), true)))
        })?;

        if changed {
            info!(id, ?outcome, secs = ?record.duration_secs(), "pause concluded");
        } else {
            debug!(id, "pause already concluded; ignoring");
        }
        Ok(record)
    }
}
