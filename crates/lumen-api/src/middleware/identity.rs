//! Caller identity forwarded by the authenticating proxy

use std::convert::Infallible;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's id, if the request carried one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeCaller(pub Option<String>);

impl MaybeCaller {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// An authenticated caller; rejects with 401 otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub String);

fn caller_id(parts: &Parts, state: &AppState) -> Option<String> {
    parts
        .headers
        .get(state.config.auth.user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeCaller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        Ok(MaybeCaller(caller_id(parts, state)))
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        caller_id(parts, state).map(Caller).ok_or(ApiError::Unauthorized)
    }
}
