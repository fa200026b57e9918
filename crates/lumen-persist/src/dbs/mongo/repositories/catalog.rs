use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use super::driver_limit;
use crate::dbs::mongo::models::{MongoSpace, MongoTrendingTopic};
use crate::error::Result;

#[derive(Clone)]
pub struct MongoTopicRepository {
    collection: Collection<MongoTrendingTopic>,
}

impl MongoTopicRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("trending_topics");
        Self { collection }
    }

    pub async fn insert(&self, topic: &MongoTrendingTopic) -> Result<()> {
        self.collection.insert_one(topic).await?;
        Ok(())
    }

    pub async fn list_active(&self, limit: usize) -> Result<Vec<MongoTrendingTopic>> {
        let Some(limit) = driver_limit(limit) else {
            return Ok(Vec::new());
        };
        let topics = self
            .collection
            .find(doc! { "is_active": true })
            .sort(doc! { "view_count": -1, "created_at": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(topics)
    }

    /// Atomic `$inc`; returns whether a topic matched
    pub async fn increment_views(&self, id: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$inc": { "view_count": 1_i64 } })
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[derive(Clone)]
pub struct MongoSpaceRepository {
    collection: Collection<MongoSpace>,
}

impl MongoSpaceRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("spaces");
        Self { collection }
    }

    pub async fn insert(&self, space: &MongoSpace) -> Result<()> {
        self.collection.insert_one(space).await?;
        Ok(())
    }

    pub async fn list_active(&self, limit: usize) -> Result<Vec<MongoSpace>> {
        let Some(limit) = driver_limit(limit) else {
            return Ok(Vec::new());
        };
        let spaces = self
            .collection
            .find(doc! { "is_active": true })
            .sort(doc! { "created_at": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(spaces)
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<MongoSpace>> {
        let spaces = self
            .collection
            .find(doc! { "is_active": true, "category": category })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(spaces)
    }
}
