use axum::{
    extract::{Path, State},
    Json,
};
use lumen_persist::{Space, TrendingTopic};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiQuery, ApiResult},
    orchestrator::CategoryInfo,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SpacesQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub async fn trending(State(state): State<Arc<AppState>>) -> Json<Vec<TrendingTopic>> {
    Json(state.orchestrator.trending().await)
}

pub async fn record_view(
    State(state): State<Arc<AppState>>,
    Path(topic_id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    state.orchestrator.record_topic_view(&topic_id).await?;
    Ok(SuccessResponse::ok())
}

pub async fn spaces(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SpacesQuery>,
) -> ApiResult<Json<Vec<Space>>> {
    Ok(Json(state.orchestrator.spaces(query.category.as_deref()).await?))
}

pub async fn categories(State(state): State<Arc<AppState>>) -> Json<&'static [CategoryInfo]> {
    Json(state.orchestrator.categories())
}
