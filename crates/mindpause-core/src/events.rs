use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::CountdownState;

/// Every countdown state change produces an Event.
/// The host renders them; it maps the terminal ones onto the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PauseStarted {
        record_id: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A message checkpoint was reached.
    MessageShown {
        record_id: String,
        message_id: u32,
        text: String,
        show_at_secs: u64,
        at: DateTime<Utc>,
    },
    /// The full duration elapsed.
    PauseCompleted {
        record_id: String,
        at: DateTime<Utc>,
    },
    /// The user left before the duration elapsed.
    PauseExited {
        record_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        record_id: String,
        state: CountdownState,
        remaining_secs: u64,
        total_secs: u64,
        message: Option<String>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event concludes the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::PauseCompleted { .. } | Event::PauseExited { .. }
        )
    }
}
