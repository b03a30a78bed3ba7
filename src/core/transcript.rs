//! The committed conversation.
//!
//! Turns are only ever added in user/assistant pairs, after the assistant
//! reply has been received. A failed exchange leaves no trace here.

use crate::core::message::Message;

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a completed exchange, user turn first.
    pub fn commit_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Message::user(user));
        self.turns.push(Message::assistant(assistant));
    }

    pub fn turns(&self) -> &[Message] {
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
