use axum::{extract::State, Json};
use lumen_persist::User;
use std::sync::Arc;

use crate::{
    error::{ApiJson, ApiResult},
    middleware::Caller,
    orchestrator::UserProfile,
    state::AppState,
};

/// The authenticated caller's stored profile
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<Json<User>> {
    Ok(Json(state.orchestrator.current_user(&caller).await?))
}

/// Login callback: record the caller's profile
pub async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    ApiJson(profile): ApiJson<UserProfile>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.orchestrator.upsert_user(&caller, profile).await?))
}
