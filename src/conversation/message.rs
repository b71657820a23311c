use serde::{Deserialize, Serialize};
use strum::Display;

/// Role of a single history entry, named as the chat wire format expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One history entry. Immutable once appended; order within a history is
/// chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Model name plus system prompt for one conversational participant.
/// Immutable for the lifetime of a run; reconfiguring a persona means
/// rebuilding the conversation so its history is re-seeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub model: String,
    pub system_prompt: String,
}

/// Ordered message sequence owned by one persona.
///
/// Element 0 is always that persona's system message for the history's whole
/// lifetime; eviction only ever removes conversational entries. The two
/// histories of a conversation are never aliased: mirror updates copy
/// content by value.
#[derive(Debug, Clone)]
pub struct PersonaHistory {
    messages: Vec<Message>,
}

impl PersonaHistory {
    /// New history containing only the persona's system message.
    pub fn seeded(system_prompt: &str) -> Self {
        Self {
            messages: vec![Message::new(Role::System, system_prompt)],
        }
    }

    /// Append a conversational entry.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove and return the oldest non-system entry, if any remain.
    pub fn evict_oldest(&mut self) -> Option<Message> {
        if self.messages.len() > 1 {
            Some(self.messages.remove(1))
        } else {
            None
        }
    }

    /// Drop all conversational entries and install a new system message.
    pub fn reseed(&mut self, system_prompt: &str) {
        self.messages.clear();
        self.messages.push(Message::new(Role::System, system_prompt));
    }
}
