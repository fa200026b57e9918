use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoUser;
use crate::error::{PersistError, Result};
use crate::models::UpsertUser;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<MongoUser>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// `$set` the supplied fields, `$setOnInsert` the creation time
    pub async fn upsert_user(&self, upsert: UpsertUser, now: DateTime<Utc>) -> Result<MongoUser> {
        let now = bson::DateTime::from_chrono(now);
        let mut set = Document::new();
        let fields = [
            ("email", upsert.email),
            ("first_name", upsert.first_name),
            ("last_name", upsert.last_name),
            ("profile_image_url", upsert.profile_image_url),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                set.insert(name, value);
            }
        }
        set.insert("updated_at", now);

        let update = doc! {
            "$set": set,
            "$setOnInsert": { "created_at": now },
        };
        self.collection
            .find_one_and_update(doc! { "_id": upsert.id.as_str() }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| PersistError::Internal(format!("upsert of user {} returned nothing", upsert.id)))
    }
}
