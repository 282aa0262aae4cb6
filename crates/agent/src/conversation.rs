//! In-process conversation memory.
//!
//! Only finished user/assistant turns are remembered; the tool-call
//! exchanges inside a turn are scratch state and never replayed.

use crate::llm::ChatMessage;

#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatMessage::assistant(content));
    }

    /// The most recent `window` turns, oldest first.
    pub fn window(&self, window: usize) -> Vec<ChatMessage> {
        let start = self.turns.len().saturating_sub(window);
        self.turns[start..].to_vec()
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
