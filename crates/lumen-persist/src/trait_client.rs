use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Conversation, ConversationUpdate, Message, NewConversation, NewMessage, NewSearch, NewSpace,
    NewTrendingTopic, Search, SearchHistory, Space, TrendingTopic, UpsertUser, User,
};

/// Trait for database persistence operations
///
/// Implementations provide database-specific CRUD operations. Each call is
/// atomic on its own; nothing spans calls.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Short name for logs ("memory", "mongodb")
    fn backend_name(&self) -> &'static str;

    // Users

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    /// Merge-by-id; creates the user when absent
    async fn upsert_user(&self, user: UpsertUser) -> Result<User>;

    // Searches

    async fn create_search(&self, search: NewSearch) -> Result<Search>;

    async fn get_search(&self, id: &str) -> Result<Option<Search>>;

    /// Newest first
    async fn list_searches_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Search>>;

    async fn add_search_history(&self, user_id: &str, search_id: &str) -> Result<SearchHistory>;

    /// Newest first
    async fn list_search_history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchHistory>>;

    // Conversations

    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation>;

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>>;

    /// Most recently updated first
    async fn list_conversations_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Conversation>>;

    /// Most recently updated unowned conversations
    async fn list_recent_conversations(&self, limit: usize) -> Result<Vec<Conversation>>;

    /// Merge the update and refresh `updated_at`
    ///
    /// Fails with `ConversationNotFound` when the id is unknown.
    async fn update_conversation(&self, id: &str, update: ConversationUpdate) -> Result<Conversation>;

    /// Remove the conversation record only; returns whether it existed
    async fn delete_conversation(&self, id: &str) -> Result<bool>;

    /// Case-insensitive substring match over title and summary
    async fn search_conversations(&self, text: &str, limit: usize) -> Result<Vec<Conversation>>;

    // Messages

    /// Fails with `ConversationNotFound` when the conversation is unknown
    async fn create_message(&self, message: NewMessage) -> Result<Message>;

    /// Oldest first
    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Returns the number of messages removed
    async fn delete_messages(&self, conversation_id: &str) -> Result<u64>;

    // Trending topics

    /// Active topics, most viewed first
    async fn list_trending_topics(&self, limit: usize) -> Result<Vec<TrendingTopic>>;

    async fn create_trending_topic(&self, topic: NewTrendingTopic) -> Result<TrendingTopic>;

    /// Add one view; returns whether the topic exists
    async fn increment_topic_views(&self, id: &str) -> Result<bool>;

    // Spaces

    /// Active spaces, oldest first
    async fn list_spaces(&self, limit: usize) -> Result<Vec<Space>>;

    async fn list_spaces_by_category(&self, category: &str) -> Result<Vec<Space>>;

    async fn create_space(&self, space: NewSpace) -> Result<Space>;
}
