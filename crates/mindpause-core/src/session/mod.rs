mod controller;
mod countdown;
mod messages;

pub use controller::SessionController;
pub use countdown::{CountdownState, PauseCountdown};
pub use messages::{default_messages, message_at, MotivationalMessage, PAUSE_DURATION_SECS};
