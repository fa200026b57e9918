use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use super::{driver_limit, escape_regex};
use crate::dbs::mongo::models::MongoConversation;
use crate::error::Result;
use crate::models::ConversationUpdate;

#[derive(Clone)]
pub struct MongoConversationRepository {
    collection: Collection<MongoConversation>,
}

impl MongoConversationRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }

    pub async fn insert(&self, conversation: &MongoConversation) -> Result<()> {
        self.collection.insert_one(conversation).await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<MongoConversation>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.collection.count_documents(doc! { "_id": id }).limit(1).await? > 0)
    }

    /// Most recently updated first
    pub async fn list(&self, filter: Document, limit: usize) -> Result<Vec<MongoConversation>> {
        let Some(limit) = driver_limit(limit) else {
            return Ok(Vec::new());
        };
        let conversations = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(conversations)
    }

    pub async fn list_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<MongoConversation>> {
        self.list(doc! { "user_id": user_id }, limit).await
    }

    pub async fn list_unowned(&self, limit: usize) -> Result<Vec<MongoConversation>> {
        self.list(doc! { "user_id": Bson::Null }, limit).await
    }

    pub async fn search(&self, text: &str, limit: usize) -> Result<Vec<MongoConversation>> {
        let pattern = escape_regex(text);
        let filter = doc! {
            "$or": [
                { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                { "summary": { "$regex": pattern.as_str(), "$options": "i" } },
            ]
        };
        self.list(filter, limit).await
    }

    /// `$max` keeps `updated_at` from moving backwards under clock skew
    pub async fn update(
        &self,
        id: &str,
        update: ConversationUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<MongoConversation>> {
        let mut set = Document::new();
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(summary) = update.summary {
            set.insert("summary", summary);
        }

        let mut changes = doc! { "$max": { "updated_at": bson::DateTime::from_chrono(now) } };
        if !set.is_empty() {
            changes.insert("$set", set);
        }

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, changes)
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
