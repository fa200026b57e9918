use chrono::{DateTime, Utc};
use lumen_types::Source;
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub sources: Vec<Source>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub sources: Vec<Source>,
}

impl NewMessage {
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role: MessageRole::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            sources,
        }
    }

    pub fn into_message(self, now: DateTime<Utc>) -> Message {
        Message {
            id: new_id(),
            conversation_id: self.conversation_id,
            role: self.role,
            content: self.content,
            sources: self.sources,
            created_at: now,
        }
    }
}
