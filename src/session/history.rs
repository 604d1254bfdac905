//! Bounded conversation history.

use crate::completion::ChatMessage;

/// Default number of retained entries (three user/assistant pairs).
pub const DEFAULT_MAX_HISTORY: usize = 6;

/// Ordered turns of one conversation, keeping only the most recent `max_len`.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<ChatMessage>,
    max_len: usize,
}

impl ConversationHistory {
    pub fn new(max_len: usize) -> Self {
        Self {
            turns: Vec::with_capacity(max_len + 2),
            max_len,
        }
    }

    /// Append a completed exchange, then drop the oldest entries past the bound.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) {
        self.turns.push(ChatMessage::user(user));
        self.turns.push(ChatMessage::assistant(assistant));
        if self.turns.len() > self.max_len {
            let excess = self.turns.len() - self.max_len;
            self.turns.drain(..excess);
        }
    }

    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;

    #[test]
    fn test_history_bound() {
        let mut history = ConversationHistory::default();
        for n in 1..=5 {
            history.record_exchange(&format!("q{}", n), &format!("a{}", n));
            assert_eq!(history.len(), (2 * n).min(6));
        }

        let contents: Vec<&str> = history.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["q3", "a3", "q4", "a4", "q5", "a5"]);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[5].role, Role::Assistant);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new(4);
        history.record_exchange("q", "a");
        assert!(!history.is_empty());
        history.clear();
        assert!(history.is_empty());
    }
}
