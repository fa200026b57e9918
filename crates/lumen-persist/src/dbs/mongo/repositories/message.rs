use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    pub async fn insert(&self, message: &MongoMessage) -> Result<()> {
        self.collection.insert_one(message).await?;
        Ok(())
    }

    /// Most recent message in a conversation, if any
    pub async fn last(&self, conversation_id: &str) -> Result<Option<MongoMessage>> {
        Ok(self
            .collection
            .find_one(doc! { "conversation_id": conversation_id })
            .sort(doc! { "created_at": -1 })
            .await?)
    }

    /// All messages for a conversation, oldest first
    pub async fn list(&self, conversation_id: &str) -> Result<Vec<MongoMessage>> {
        let messages = self
            .collection
            .find(doc! { "conversation_id": conversation_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    pub async fn delete_all(&self, conversation_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "conversation_id": conversation_id })
            .await?;
        Ok(result.deleted_count)
    }
}
