mod model;
mod record_ledger;

pub use model::{count_today, AppState, Habit, PauseOutcome, PauseRecord, SessionState};
pub use record_ledger::RecordLedger;

pub(crate) use record_ledger::{next_record_id, Mutation};
