use axum::{
    extract::{Path, State},
    Json,
};
use lumen_persist::Search;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiJson, ApiResult},
    middleware::{Caller, MaybeCaller, QueryParams},
    orchestrator::SearchOutcome,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Answer a query and record it
pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    ApiJson(req): ApiJson<SearchRequest>,
) -> ApiResult<Json<SearchOutcome>> {
    let query = req.query.unwrap_or_default();
    let outcome = state
        .orchestrator
        .submit_search(&query, req.category, caller.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// Query completions; always succeeds
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Json<SuggestionsResponse> {
    let partial = params.text("q").unwrap_or_default();
    let suggestions = state.orchestrator.suggestions(partial).await;
    Json(SuggestionsResponse { suggestions })
}

pub async fn get_search(
    State(state): State<Arc<AppState>>,
    Path(search_id): Path<String>,
) -> ApiResult<Json<Search>> {
    Ok(Json(state.orchestrator.get_search(&search_id).await?))
}

/// The caller's past searches
pub async fn search_history(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<Vec<Search>>> {
    Ok(Json(state.orchestrator.search_history(&caller).await?))
}
