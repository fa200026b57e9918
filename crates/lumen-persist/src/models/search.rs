use chrono::{DateTime, Utc};
use lumen_types::Source;
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub id: String,
    pub user_id: Option<String>,
    pub query: String,
    pub response: Option<String>,
    pub category: Option<String>,
    pub sources: Vec<Source>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSearch {
    pub user_id: Option<String>,
    pub query: String,
    pub response: Option<String>,
    pub category: Option<String>,
    pub sources: Vec<Source>,
}

impl NewSearch {
    pub fn into_search(self, now: DateTime<Utc>) -> Search {
        Search {
            id: new_id(),
            user_id: self.user_id,
            query: self.query,
            response: self.response,
            category: self.category,
            sources: self.sources,
            created_at: now,
        }
    }
}

/// Append-only link between a user and a search they ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    pub id: String,
    pub user_id: String,
    pub search_id: String,
    pub created_at: DateTime<Utc>,
}

impl SearchHistory {
    pub fn new(user_id: &str, search_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            search_id: search_id.to_string(),
            created_at: now,
        }
    }
}
