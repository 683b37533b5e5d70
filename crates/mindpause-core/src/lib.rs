//! # MindPause Core Library
//!
//! This library provides the core logic for MindPause, a one-minute
//! "mindful pause" taken before acting on an impulse. All operations are
//! available through the `mindpause` CLI binary, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Ledger**: The persisted application state (current decision plus the
//!   history of pause attempts), written through to a key-value store on
//!   every change
//! - **Session**: The per-attempt lifecycle (Idle, Active, Concluded) and a
//!   wall-clock countdown that requires the caller to periodically invoke
//!   `tick()`
//! - **Habits**: A hand-kept list of habits being given up, each with a
//!   count of days without it
//! - **Stats**: Pure aggregation over the record list, including Jalali
//!   calendar period filters
//! - **Storage**: SQLite or in-memory blob stores and TOML configuration
//!
//! ## Key Components
//!
//! - [`RecordLedger`]: Write-through owner of the application state
//! - [`SessionController`]: Starts and concludes pause attempts
//! - [`PauseCountdown`]: Countdown state machine for a running pause
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod session;
pub mod stats;
pub mod storage;

pub use calendar::JalaliDate;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, PersistenceError, Result, ValidationError};
pub use events::Event;
pub use ledger::{AppState, Habit, PauseOutcome, PauseRecord, RecordLedger, SessionState};
pub use session::{CountdownState, MotivationalMessage, PauseCountdown, SessionController};
pub use stats::{Period, PeriodMode, Summary};
pub use storage::{Config, MemoryStore, SqliteStore, StateStore, StoreBackend};
