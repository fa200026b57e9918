use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub read_time: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrendingTopic {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub read_time: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub view_count: i64,
}

impl NewTrendingTopic {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            read_time: None,
            icon: None,
            is_active: true,
            view_count: 0,
        }
    }

    pub fn into_topic(self, now: DateTime<Utc>) -> TrendingTopic {
        TrendingTopic {
            id: new_id(),
            title: self.title,
            description: self.description,
            category: self.category,
            read_time: self.read_time,
            icon: self.icon,
            is_active: self.is_active,
            view_count: self.view_count.max(0),
            created_at: now,
        }
    }
}

/// A curated collection of query templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub template_count: i32,
    pub icon: Option<String>,
    pub gradient: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpace {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub template_count: i32,
    pub icon: Option<String>,
    pub gradient: Option<String>,
    pub tags: Vec<String>,
    pub is_active: bool,
}

impl NewSpace {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            category: category.into(),
            template_count: 0,
            icon: None,
            gradient: None,
            tags: Vec::new(),
            is_active: true,
        }
    }

    pub fn into_space(self, now: DateTime<Utc>) -> Space {
        Space {
            id: new_id(),
            title: self.title,
            description: self.description,
            category: self.category,
            template_count: self.template_count,
            icon: self.icon,
            gradient: self.gradient,
            tags: self.tags,
            is_active: self.is_active,
            created_at: now,
        }
    }
}
