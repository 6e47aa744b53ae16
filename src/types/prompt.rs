use super::message::ChatTurn;
use crate::response::NormalizedResult;

/// An ordered conversation. Order defines dialogue causality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Create a conversation opening with a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            turns: vec![ChatTurn::system(content)],
        }
    }

    /// Create a conversation opening with a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            turns: vec![ChatTurn::user(content)],
        }
    }

    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.turns.push(ChatTurn::system(content));
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.turns.push(ChatTurn::user(content));
        self
    }

    pub fn with_assistant(mut self, content: impl Into<String>) -> Self {
        self.turns.push(ChatTurn::assistant(content));
        self
    }

    pub fn with_turn(mut self, turn: ChatTurn) -> Self {
        self.turns.push(turn);
        self
    }

    /// Append a completed reply as an assistant turn.
    pub fn with_result(self, result: &NormalizedResult) -> Self {
        self.with_assistant(result.text.clone())
    }

    /// Get the turns in order.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<&str> for Conversation {
    fn from(s: &str) -> Self {
        Conversation::user(s)
    }
}

impl From<String> for Conversation {
    fn from(s: String) -> Self {
        Conversation::user(s)
    }
}

impl From<Vec<ChatTurn>> for Conversation {
    fn from(turns: Vec<ChatTurn>) -> Self {
        Conversation { turns }
    }
}
