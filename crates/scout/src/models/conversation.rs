use serde::{Deserialize, Serialize};

use super::message::Message;
use super::role::Role;

/// One seeded turn of a conversation as a caller supplies it.
///
/// Callers may send a bare string, which is always treated as a user turn, or an
/// explicit `{"role": ..., "content": ...}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationTurn {
    Text(String),
    Turn { role: Role, content: String },
}

impl ConversationTurn {
    pub fn user<S: Into<String>>(text: S) -> Self {
        ConversationTurn::Text(text.into())
    }

    pub fn role(&self) -> Role {
        match self {
            ConversationTurn::Text(_) => Role::User,
            ConversationTurn::Turn { role, .. } => *role,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ConversationTurn::Text(text) => text,
            ConversationTurn::Turn { content, .. } => content,
        }
    }
}

impl From<&ConversationTurn> for Message {
    fn from(turn: &ConversationTurn) -> Self {
        Message::new(turn.role()).with_text(turn.content())
    }
}

/// Convert seeded turns into agent messages, preserving order
pub fn to_messages(turns: &[ConversationTurn]) -> Vec<Message> {
    turns.iter().map(Message::from).collect()
}
