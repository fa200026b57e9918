use lumen_persist::NewSearch;
use lumen_types::Source;
use serde::Serialize;

use super::Orchestrator;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub search_id: String,
    pub query: String,
    pub response: String,
    pub sources: Vec<Source>,
    pub category: Option<String>,
}

impl Orchestrator {
    /// Answer a one-shot query and record it
    pub async fn submit_search(
        &self,
        query: &str,
        category: Option<String>,
        caller: Option<&str>,
    ) -> ApiResult<SearchOutcome> {
        if query.trim().is_empty() {
            return Err(ApiError::BadRequest("Query is required".to_string()));
        }

        let mut category = category.filter(|c| !c.trim().is_empty());
        if category.is_none() && self.settings.auto_categorize {
            category = self
                .gateway
                .classify_category(query)
                .await
                .map(|c| c.to_string());
        }

        let answer = self.gateway.generate_answer(query, category.as_deref()).await;

        let search = self
            .store
            .create_search(NewSearch {
                user_id: caller.map(str::to_string),
                query: query.to_string(),
                response: Some(answer.content.clone()),
                category: category.clone(),
                sources: answer.sources.clone(),
            })
            .await?;

        if let Some(caller) = caller {
            if let Err(e) = self.store.add_search_history(caller, &search.id).await {
                tracing::warn!(error = %e, search_id = %search.id, "Failed to record search history");
            }
        }

        tracing::debug!(search_id = %search.id, category = ?category, "Search answered");

        Ok(SearchOutcome {
            search_id: search.id,
            query: query.to_string(),
            response: answer.content,
            sources: answer.sources,
            category,
        })
    }

    /// Query completions; empty for blank input
    pub async fn suggestions(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Vec::new();
        }
        self.gateway.generate_suggestions(partial).await
    }
}
