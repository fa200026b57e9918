use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lumen_api::{build_router, config::Config, state::AppState};
use lumen_llm::Gateway;
use lumen_persist::{seed_defaults, InMemoryStore, PersistenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Lumen API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let gateway = Gateway::from_providers(&config.provider_configs());
    if gateway.is_configured() {
        tracing::info!(providers = ?gateway.backend_names(), "AI gateway ready");
    } else {
        tracing::warn!("No AI provider configured; answers will be placeholders");
    }

    let store = connect_store(&config).await;
    if let Err(e) = seed_defaults(store.as_ref()).await {
        tracing::warn!(error = %e, "Failed to seed default catalog");
    }

    let state = Arc::new(AppState::new(config.clone(), store, gateway));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// MongoDB when configured and reachable, otherwise the in-memory store
async fn connect_store(config: &Config) -> Arc<dyn PersistenceClient> {
    if let Some(uri) = config.mongodb_uri.as_deref() {
        if let Some(store) = connect_mongo(uri, &config.mongodb.database).await {
            return store;
        }
    }

    tracing::warn!("Using in-memory store; data will not survive a restart");
    Arc::new(InMemoryStore::new())
}

#[cfg(feature = "mongodb")]
async fn connect_mongo(uri: &str, database: &str) -> Option<Arc<dyn PersistenceClient>> {
    tracing::info!("Connecting to MongoDB");
    match lumen_persist::MongoPersistenceClient::connect(uri, database).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "MongoDB unavailable");
            None
        }
    }
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongo(_uri: &str, _database: &str) -> Option<Arc<dyn PersistenceClient>> {
    tracing::warn!("MONGODB_URI is set but this build has no MongoDB support");
    None
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
