use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use mongodb::Client;

use crate::dbs::mongo::models::{
    MongoConversation, MongoMessage, MongoSearch, MongoSearchHistory, MongoSpace, MongoTrendingTopic,
};
use crate::dbs::mongo::repositories::{
    MongoConversationRepository, MongoMessageRepository, MongoSearchRepository, MongoSpaceRepository,
    MongoTopicRepository, MongoUserRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{
    Conversation, ConversationUpdate, Message, NewConversation, NewMessage, NewSearch, NewSpace,
    NewTrendingTopic, Search, SearchHistory, Space, TrendingTopic, UpsertUser, User,
};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    user_repo: MongoUserRepository,
    search_repo: MongoSearchRepository,
    conversation_repo: MongoConversationRepository,
    message_repo: MongoMessageRepository,
    topic_repo: MongoTopicRepository,
    space_repo: MongoSpaceRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and verify the server answers a ping
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database = %database, "Connected to MongoDB");

        Ok(Self {
            user_repo: MongoUserRepository::new(&client, database),
            search_repo: MongoSearchRepository::new(&client, database),
            conversation_repo: MongoConversationRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
            topic_repo: MongoTopicRepository::new(&client, database),
            space_repo: MongoSpaceRepository::new(&client, database),
        })
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.user_repo.get_user(id).await?.map(Into::into))
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User> {
        Ok(self.user_repo.upsert_user(user, Utc::now()).await?.into())
    }

    async fn create_search(&self, search: NewSearch) -> Result<Search> {
        let search = search.into_search(Utc::now());
        self.search_repo
            .insert_search(&MongoSearch::from(search.clone()))
            .await?;
        Ok(search)
    }

    async fn get_search(&self, id: &str) -> Result<Option<Search>> {
        Ok(self.search_repo.get_search(id).await?.map(Into::into))
    }

    async fn list_searches_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Search>> {
        let searches = self.search_repo.list_by_user(user_id, limit).await?;
        Ok(searches.into_iter().map(Into::into).collect())
    }

    async fn add_search_history(&self, user_id: &str, search_id: &str) -> Result<SearchHistory> {
        let entry = SearchHistory::new(user_id, search_id, Utc::now());
        self.search_repo
            .insert_history(&MongoSearchHistory::from(entry.clone()))
            .await?;
        Ok(entry)
    }

    async fn list_search_history(&self, user_id: &str, limit: usize) -> Result<Vec<SearchHistory>> {
        let entries = self.search_repo.list_history(user_id, limit).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation> {
        let conversation = conversation.into_conversation(Utc::now());
        self.conversation_repo
            .insert(&MongoConversation::from(conversation.clone()))
            .await?;
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversation_repo.get(id).await?.map(Into::into))
    }

    async fn list_conversations_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let conversations = self.conversation_repo.list_by_user(user_id, limit).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    async fn list_recent_conversations(&self, limit: usize) -> Result<Vec<Conversation>> {
        let conversations = self.conversation_repo.list_unowned(limit).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    async fn update_conversation(&self, id: &str, update: ConversationUpdate) -> Result<Conversation> {
        self.conversation_repo
            .update(id, update, Utc::now())
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::ConversationNotFound(id.to_string()))
    }

    async fn delete_conversation(&self, id: &str) -> Result<bool> {
        self.conversation_repo.delete(id).await
    }

    async fn search_conversations(&self, text: &str, limit: usize) -> Result<Vec<Conversation>> {
        let conversations = self.conversation_repo.search(text, limit).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        if !self.conversation_repo.exists(&message.conversation_id).await? {
            return Err(PersistError::ConversationNotFound(message.conversation_id));
        }

        let mut stored = message.into_message(Utc::now());
        if let Some(last) = self.message_repo.last(&stored.conversation_id).await? {
            stored.created_at = stored.created_at.max(last.created_at);
        }
        self.message_repo
            .insert(&MongoMessage::from(stored.clone()))
            .await?;
        Ok(stored)
    }

    async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let messages = self.message_repo.list(conversation_id).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    async fn delete_messages(&self, conversation_id: &str) -> Result<u64> {
        self.message_repo.delete_all(conversation_id).await
    }

    async fn list_trending_topics(&self, limit: usize) -> Result<Vec<TrendingTopic>> {
        let topics = self.topic_repo.list_active(limit).await?;
        Ok(topics.into_iter().map(Into::into).collect())
    }

    async fn create_trending_topic(&self, topic: NewTrendingTopic) -> Result<TrendingTopic> {
        let topic = topic.into_topic(Utc::now());
        self.topic_repo
            .insert(&MongoTrendingTopic::from(topic.clone()))
            .await?;
        Ok(topic)
    }

    async fn increment_topic_views(&self, id: &str) -> Result<bool> {
        self.topic_repo.increment_views(id).await
    }

    async fn list_spaces(&self, limit: usize) -> Result<Vec<Space>> {
        let spaces = self.space_repo.list_active(limit).await?;
        Ok(spaces.into_iter().map(Into::into).collect())
    }

    async fn list_spaces_by_category(&self, category: &str) -> Result<Vec<Space>> {
        let spaces = self.space_repo.list_by_category(category).await?;
        Ok(spaces.into_iter().map(Into::into).collect())
    }

    async fn create_space(&self, space: NewSpace) -> Result<Space> {
        let space = space.into_space(Utc::now());
        self.space_repo
            .insert(&MongoSpace::from(space.clone()))
            .await?;
        Ok(space)
    }
}
