use axum::{
    extract::{Path, State},
    Json,
};
use lumen_types::Source;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiJson, ApiResult},
    middleware::{MaybeCaller, QueryParams},
    orchestrator::{ChatTurn, Thread, ThreadSummary},
    routes::catalog::SuccessResponse,
    state::AppState,
};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThreadRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyChatResponse {
    pub conversation_id: String,
    pub response: String,
    pub sources: Vec<Source>,
}

/// Post a message to a new or existing thread
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    ApiJson(req): ApiJson<ChatThreadRequest>,
) -> ApiResult<Json<ChatTurn>> {
    let turn = state
        .orchestrator
        .post_chat_message(req.message.unwrap_or_default(), req.thread_id, caller.0)
        .await?;
    Ok(Json(turn))
}

/// Conversation-id flavored chat endpoint kept for older clients
pub async fn legacy_chat(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    ApiJson(req): ApiJson<LegacyChatRequest>,
) -> ApiResult<Json<LegacyChatResponse>> {
    let turn = state
        .orchestrator
        .post_chat_message(req.message.unwrap_or_default(), req.conversation_id, caller.0)
        .await?;
    Ok(Json(LegacyChatResponse {
        conversation_id: turn.thread_id,
        response: turn.response,
        sources: turn.sources,
    }))
}

pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    params: QueryParams,
) -> Json<Vec<ThreadSummary>> {
    let limit = params.limit(DEFAULT_LIMIT, MAX_LIMIT);
    Json(state.orchestrator.list_threads(limit, caller.as_deref()).await)
}

pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    Ok(Json(state.orchestrator.get_thread(&thread_id, caller.as_deref()).await?))
}

pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .orchestrator
        .delete_thread(&thread_id, caller.as_deref())
        .await?;
    Ok(SuccessResponse::ok())
}

pub async fn search_threads(
    State(state): State<Arc<AppState>>,
    caller: MaybeCaller,
    params: QueryParams,
) -> Json<Vec<ThreadSummary>> {
    let text = params.text("q").unwrap_or_default();
    let limit = params.limit(DEFAULT_LIMIT, MAX_LIMIT);
    Json(state.orchestrator.search_threads(text, limit, caller.as_deref()).await)
}
