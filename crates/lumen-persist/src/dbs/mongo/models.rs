//! MongoDB document shapes
//!
//! Ids are UUID strings stored in `_id`; timestamps are BSON dates so that
//! range queries and sorts behave.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use lumen_types::Source;
use serde::{Deserialize, Serialize};

use crate::models::{
    Conversation, Message, MessageRole, Search, SearchHistory, Space, TrendingTopic, User,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSearch {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: Option<String>,
    pub query: String,
    pub response: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSearchHistory {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub search_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConversation {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTrendingTopic {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub read_time: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub view_count: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSpace {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub template_count: i32,
    pub icon: Option<String>,
    pub gradient: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

// Conversions between database-agnostic and MongoDB-specific models

macro_rules! mirror {
    ($model:ident <=> $doc:ident { $($field:ident),* $(,)? }) => {
        impl From<$model> for $doc {
            fn from(m: $model) -> Self {
                Self { $($field: m.$field),* }
            }
        }

        impl From<$doc> for $model {
            fn from(d: $doc) -> Self {
                Self { $($field: d.$field),* }
            }
        }
    };
}

mirror!(User <=> MongoUser {
    id, email, first_name, last_name, profile_image_url, created_at, updated_at,
});
mirror!(Search <=> MongoSearch {
    id, user_id, query, response, category, sources, created_at,
});
mirror!(SearchHistory <=> MongoSearchHistory {
    id, user_id, search_id, created_at,
});
mirror!(Conversation <=> MongoConversation {
    id, user_id, title, summary, created_at, updated_at,
});
mirror!(Message <=> MongoMessage {
    id, conversation_id, role, content, sources, created_at,
});
mirror!(TrendingTopic <=> MongoTrendingTopic {
    id, title, description, category, read_time, icon, is_active, view_count, created_at,
});
mirror!(Space <=> MongoSpace {
    id, title, description, category, template_count, icon, gradient, tags, is_active, created_at,
});
