use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use super::driver_limit;
use crate::dbs::mongo::models::{MongoSearch, MongoSearchHistory};
use crate::error::Result;

/// Searches and the per-user history that points at them
#[derive(Clone)]
pub struct MongoSearchRepository {
    searches: Collection<MongoSearch>,
    history: Collection<MongoSearchHistory>,
}

impl MongoSearchRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        Self {
            searches: db.collection("searches"),
            history: db.collection("search_history"),
        }
    }

    pub async fn insert_search(&self, search: &MongoSearch) -> Result<()> {
        self.searches.insert_one(search).await?;
        Ok(())
    }

    pub async fn get_search(&self, id: &str) -> Result<Option<MongoSearch>> {
        Ok(self.searches.find_one(doc! { "_id": id }).await?)
    }

    pub async fn list_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<MongoSearch>> {
        let Some(limit) = driver_limit(limit) else {
            return Ok(Vec::new());
        };
        let searches = self
            .searches
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(searches)
    }

    pub async fn insert_history(&self, entry: &MongoSearchHistory) -> Result<()> {
        self.history.insert_one(entry).await?;
        Ok(())
    }

    pub async fn list_history(&self, user_id: &str, limit: usize) -> Result<Vec<MongoSearchHistory>> {
        let Some(limit) = driver_limit(limit) else {
            return Ok(Vec::new());
        };
        let entries = self
            .history
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }
}
