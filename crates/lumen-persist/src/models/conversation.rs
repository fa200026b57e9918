use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// A chat thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Unowned threads are public; owned threads belong to their owner alone
    pub fn is_visible_to(&self, caller: Option<&str>) -> bool {
        match self.user_id.as_deref() {
            None => true,
            Some(owner) => caller == Some(owner),
        }
    }

    /// Merge an update and refresh `updated_at` without moving it backwards
    pub fn apply(&mut self, update: ConversationUpdate, now: DateTime<Utc>) {
        if update.title.is_some() {
            self.title = update.title;
        }
        if update.summary.is_some() {
            self.summary = update.summary;
        }
        self.updated_at = now.max(self.updated_at);
    }

    /// Case-insensitive substring match over title and summary
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        [&self.title, &self.summary]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewConversation {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl NewConversation {
    pub fn into_conversation(self, now: DateTime<Utc>) -> Conversation {
        Conversation {
            id: new_id(),
            user_id: self.user_id,
            title: self.title,
            summary: self.summary,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` fields are left as stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationUpdate {
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl ConversationUpdate {
    /// An empty update, used to bump `updated_at`
    pub fn touch() -> Self {
        Self::default()
    }
}
