use std::sync::Arc;

use lumen_llm::Gateway;
use lumen_persist::PersistenceClient;

use crate::config::Config;
use crate::orchestrator::{Orchestrator, OrchestratorSettings};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PersistenceClient>, gateway: Gateway) -> Self {
        let settings = OrchestratorSettings {
            auto_categorize: config.search.auto_categorize,
            history_limit: config.search.history_limit,
        };
        Self {
            config: Arc::new(config),
            orchestrator: Orchestrator::new(store, gateway, settings),
        }
    }
}
