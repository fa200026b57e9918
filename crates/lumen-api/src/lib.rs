pub mod config;
pub mod error;
pub mod middleware;
pub mod orchestrator;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::logging;
use crate::routes::{auth, catalog, chat, health, search};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Auth
        .route("/auth/user", get(auth::current_user).post(auth::upsert_user))
        // Search
        .route("/search", post(search::submit_search))
        .route("/search/suggestions", get(search::suggestions))
        .route("/search/history", get(search::search_history))
        .route("/search/:search_id", get(search::get_search))
        // Catalog
        .route("/trending", get(catalog::trending))
        .route("/trending/:topic_id/view", post(catalog::record_view))
        .route("/spaces", get(catalog::spaces))
        .route("/categories", get(catalog::categories))
        // Chat
        .route("/chat", post(chat::legacy_chat))
        .route("/chat/threads", get(chat::list_threads).post(chat::post_message))
        .route(
            "/chat/threads/:thread_id",
            get(chat::get_thread).delete(chat::delete_thread),
        )
        .route("/chat/search", get(chat::search_threads));

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::map_response(error::timeout_body))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}
