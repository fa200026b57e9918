mod catalog;
mod conversation;
mod message;
mod search;
mod user;

// Export database-agnostic models
pub use catalog::{NewSpace, NewTrendingTopic, Space, TrendingTopic};
pub use conversation::{Conversation, ConversationUpdate, NewConversation};
pub use message::{Message, MessageRole, NewMessage};
pub use search::{NewSearch, Search, SearchHistory};
pub use user::{UpsertUser, User};

/// Fresh record id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
