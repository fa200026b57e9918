//! Lenient query-string access for endpoints that must not reject

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};

/// Query parameters read without failing
///
/// A repeated key keeps its last value. A query string that cannot be decoded
/// at all reads as empty, and a value of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_uri(uri: &Uri) -> Self {
        match Query::<HashMap<String, String>>::try_from_uri(uri) {
            Ok(Query(params)) => Self(params),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring undecodable query string");
                Self::default()
            }
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// `limit`, falling back to `default` when missing or not a number, capped at `max`
    pub fn limit(&self, default: usize, max: usize) -> usize {
        self.text("limit")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(default)
            .min(max)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(&parts.uri))
    }
}
