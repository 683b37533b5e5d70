use serde::{Deserialize, Serialize};

/// Length of one pause session.
pub const PAUSE_DURATION_SECS: u64 = 60;

/// A message shown once the pause has run for `show_at_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotivationalMessage {
    pub id: u32,
    pub text: String,
    pub show_at_secs: u64,
}

impl MotivationalMessage {
    pub fn new(id: u32, text: impl Into<String>, show_at_secs: u64) -> Self {
        Self {
            id,
            text: text.into(),
            show_at_secs,
        }
    }
}

/// Checkpoints at 0, 20 and 40 seconds.
pub fn default_messages() -> Vec<MotivationalMessage> {
    vec![
        MotivationalMessage::new(1, "Bring your attention to your breath", 0),
        MotivationalMessage::new(2, "Your mind is not helping right now", 20),
        MotivationalMessage::new(3, "You have already made your decision", 40),
    ]
}

/// The latest message whose checkpoint is at or before `elapsed_secs`.
///
/// `messages` must be sorted by `show_at_secs`.
pub fn message_at(messages: &[MotivationalMessage], elapsed_secs: u64) -> Option<&MotivationalMessage> {
    messages
        .iter()
        .take_while(|m| m.show_at_secs <= elapsed_secs)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_rotation() {
        let messages = default_messages();
        assert_eq!(message_at(&messages, 0).map(|m| m.id), Some(1));
        assert_eq!(message_at(&messages, 19).map(|m| m.id), Some(1));
        assert_eq!(message_at(&messages, 20).map(|m| m.id), Some(2));
        assert_eq!(message_at(&messages, 59).map(|m| m.id), Some(3));
    }

    #[test]
    fn nothing_before_first_checkpoint() {
        let messages = vec![MotivationalMessage::new(1, "late", 10)];
        assert!(message_at(&messages, 9).is_none());
        assert!(message_at(&[], 30).is_none());
    }
}
