use lumen_persist::{Search, Space, TrendingTopic, UpsertUser, User};
use serde::{Deserialize, Serialize};

use super::Orchestrator;
use crate::error::{ApiError, ApiResult};

const TRENDING_LIMIT: usize = 10;
const SPACES_LIMIT: usize = 10;

/// A browsable category card
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub href: &'static str,
}

pub static CATEGORIES: [CategoryInfo; 4] = [
    CategoryInfo {
        id: "finance",
        name: "Finance",
        description: "Get insights on markets, investments, and financial planning",
        icon: "fas fa-chart-line",
        color: "green",
        href: "/finance",
    },
    CategoryInfo {
        id: "travel",
        name: "Travel",
        description: "Discover destinations, plan trips, and travel tips",
        icon: "fas fa-plane",
        color: "blue",
        href: "/travel",
    },
    CategoryInfo {
        id: "shopping",
        name: "Shopping",
        description: "Find products, compare prices, and shopping advice",
        icon: "fas fa-shopping-bag",
        color: "purple",
        href: "/shopping",
    },
    CategoryInfo {
        id: "academic",
        name: "Academic",
        description: "Research assistance and educational content",
        icon: "fas fa-graduation-cap",
        color: "orange",
        href: "/academic",
    },
];

/// Profile fields forwarded by the identity provider at login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl Orchestrator {
    pub async fn get_search(&self, id: &str) -> ApiResult<Search> {
        self.store
            .get_search(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Search not found".to_string()))
    }

    /// Searches recorded in the caller's history log, newest first
    pub async fn search_history(&self, caller: &str) -> ApiResult<Vec<Search>> {
        let entries = self
            .store
            .list_search_history(caller, self.settings.history_limit)
            .await?;

        let mut searches = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.store.get_search(&entry.search_id).await? {
                Some(search) => searches.push(search),
                None => {
                    tracing::debug!(search_id = %entry.search_id, "History entry has no stored search");
                }
            }
        }
        Ok(searches)
    }

    /// Most viewed active topics; empty when the store is unavailable
    pub async fn trending(&self) -> Vec<TrendingTopic> {
        match self.store.list_trending_topics(TRENDING_LIMIT).await {
            Ok(topics) => topics,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load trending topics");
                Vec::new()
            }
        }
    }

    pub async fn record_topic_view(&self, id: &str) -> ApiResult<()> {
        if !self.store.increment_topic_views(id).await? {
            tracing::debug!(topic_id = %id, "View recorded for unknown topic");
        }
        Ok(())
    }

    pub async fn spaces(&self, category: Option<&str>) -> ApiResult<Vec<Space>> {
        let spaces = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => self.store.list_spaces_by_category(category).await?,
            None => self.store.list_spaces(SPACES_LIMIT).await?,
        };
        Ok(spaces)
    }

    pub fn categories(&self) -> &'static [CategoryInfo] {
        &CATEGORIES
    }

    pub async fn current_user(&self, caller: &str) -> ApiResult<User> {
        self.store
            .get_user(caller)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn upsert_user(&self, caller: &str, profile: UserProfile) -> ApiResult<User> {
        let user = self
            .store
            .upsert_user(UpsertUser {
                id: caller.to_string(),
                email: profile.email,
                first_name: profile.first_name,
                last_name: profile.last_name,
                profile_image_url: profile.profile_image_url,
            })
            .await?;
        tracing::info!(user_id = %user.id, "User profile updated");
        Ok(user)
    }
}
