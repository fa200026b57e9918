//! Process-local store for development and tests
//!
//! Every table sits behind its own `RwLock`. Operations that touch two
//! tables take the conversation lock before the message lock.

mod clock;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use self::clock::MonotonicClock;
use crate::error::{PersistError, Result};
use crate::models::{
    Conversation, ConversationUpdate, Message, NewConversation, NewMessage, NewSearch, NewSpace,
    NewTrendingTopic, Search, SearchHistory, Space, TrendingTopic, UpsertUser, User,
};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
pub struct InMemoryStore {
    clock: MonotonicClock,
    users: RwLock<HashMap<String, User>>,
    searches: RwLock<HashMap<String, Search>>,
    history: RwLock<Vec<SearchHistory>>,
    conversations: RwLock<HashMap<String, Conversation>>,
    messages: RwLock<HashMap<String, Vec<Message>>>,
    topics: RwLock<HashMap<String, TrendingTopic>>,
    spaces: RwLock<HashMap<String, Space>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(mut items: Vec<T>, key: F, limit: usize) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items.truncate(limit);
    items
}

#[async_trait]
impl PersistenceClient for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn upsert_user(&self, upsert: UpsertUser) -> Result<User> {
        let now = self.clock.now();
        let mut users = self.users.write().await;
        let user = match users.remove(&upsert.id) {
            Some(mut existing) => {
                existing.apply(upsert, now);
                existing
            }
            None => upsert.into_user(now),
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn create_search(&self, search: NewSearch) -> Result<Search> {
        let search = search.into_search(self.clock.now());
        self.searches
            .write()
            .await
            .insert(search.id.clone(), search.clone());
        Ok(search)
    }

    async fn get_search(&self, id: &str) -> Result<Option<Search>> {
        Ok(self.searches.read().await.get(id).cloned())
    }

    async fn list_searches_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Search>> {
        let searches = self.searches.read().await;
        let owned = searches
            .values()
            .filter(|s| s.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(owned, |s| s.created_at, limit))
    }

    async fn add_search_history(&self, user_id: &str, search_id: &str) -> Result<SearchHistory> {
        let entry = SearchHistory::new(user_id, search_id, self.clock.now());
        self.history.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn list_search_history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchHistory>> {
        let history = self.history.read().await;
        let owned = history
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(owned, |h| h.created_at, limit))
    }

    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation> {
        let conversation = conversation.into_conversation(self.clock.now());
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn list_conversations_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let owned = conversations
            .values()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(owned, |c| c.updated_at, limit))
    }

    async fn list_recent_conversations(&self, limit: usize) -> Result<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        let public = conversations
            .values()
            .filter(|c| c.user_id.is_none())
            .cloned()
            .collect();
        Ok(newest_first(public, |c| c.updated_at, limit))
    }

    async fn update_conversation(&self, id: &str, update: ConversationUpdate) -> Result<Conversation> {
        let now = self.clock.now();
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| PersistError::ConversationNotFound(id.to_string()))?;
        conversation.apply(update, now);
        Ok(conversation.clone())
    }

    async fn delete_conversation(&self, id: &str) -> Result<bool> {
        Ok(self.conversations.write().await.remove(id).is_some())
    }

    async fn search_conversations(&self, text: &str, limit: usize) -> Result<Vec<Conversation>> {
        let needle = text.to_lowercase();
        let conversations = self.conversations.read().await;
        let hits = conversations
            .values()
            .filter(|c| c.matches_text(&needle))
            .cloned()
            .collect();
        Ok(newest_first(hits, |c| c.updated_at, limit))
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        // Held across the append: the conversation cannot be removed between the check and the write
        let conversations = self.conversations.read().await;
        if !conversations.contains_key(&message.conversation_id) {
            return Err(PersistError::ConversationNotFound(message.conversation_id));
        }

        let mut messages = self.messages.write().await;
        let thread = messages.entry(message.conversation_id.clone()).or_default();
        let mut stored = message.into_message(self.clock.now());
        if let Some(last) = thread.last() {
            stored.created_at = stored.created_at.max(last.created_at);
        }
        thread.push(stored.clone());
        Ok(stored)
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_messages(&self, conversation_id: &str) -> Result<u64> {
        let removed = self.messages.write().await.remove(conversation_id);
        Ok(removed.map(|m| m.len() as u64).unwrap_or(0))
    }

    async fn list_trending_topics(&self, limit: usize) -> Result<Vec<TrendingTopic>> {
        let topics = self.topics.read().await;
        let mut active: Vec<TrendingTopic> = topics.values().filter(|t| t.is_active).cloned().collect();
        active.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        active.truncate(limit);
        Ok(active)
    }

    async fn create_trending_topic(&self, topic: NewTrendingTopic) -> Result<TrendingTopic> {
        let topic = topic.into_topic(self.clock.now());
        self.topics
            .write()
            .await
            .insert(topic.id.clone(), topic.clone());
        Ok(topic)
    }

    async fn increment_topic_views(&self, id: &str) -> Result<bool> {
        let mut topics = self.topics.write().await;
        match topics.get_mut(id) {
            Some(topic) => {
                topic.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_spaces(&self, limit: usize) -> Result<Vec<Space>> {
        let spaces = self.spaces.read().await;
        let mut active: Vec<Space> = spaces.values().filter(|s| s.is_active).cloned().collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        active.truncate(limit);
        Ok(active)
    }

    async fn list_spaces_by_category(&self, category: &str) -> Result<Vec<Space>> {
        let spaces = self.spaces.read().await;
        let mut matching: Vec<Space> = spaces
            .values()
            .filter(|s| s.is_active && s.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn create_space(&self, space: NewSpace) -> Result<Space> {
        let space = space.into_space(self.clock.now());
        self.spaces
            .write()
            .await
            .insert(space.id.clone(), space.clone());
        Ok(space)
    }
}
