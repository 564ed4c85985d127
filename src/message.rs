//! Message types for conversation thread history.
//!
//! These are travel-agent's internal types, converted to rig-core's `Message`
//! when a thread's history is sent along with the next user message.

use rig::message::Message as RigMessage;

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single completed turn half: what the user said, or what the agent replied.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}

impl From<&Message> for RigMessage {
    fn from(msg: &Message) -> Self {
        match msg.role {
            Role::User => RigMessage::user(msg.text()),
            Role::Assistant => RigMessage::assistant(msg.text()),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Assistant => write!(f, "Assistant"),
        }
    }
}
