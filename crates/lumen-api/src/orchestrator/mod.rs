//! Transport-independent request handling
//!
//! Validates input, asks the gateway for generated content, and persists the
//! results through the store. Routes only shape HTTP around these calls.

mod catalog;
mod chat;
mod search;

use std::sync::Arc;

use lumen_llm::Gateway;
use lumen_persist::PersistenceClient;

pub use catalog::{CategoryInfo, UserProfile, CATEGORIES};
pub use chat::{derive_title, preview, ChatTurn, Thread, ThreadSummary};
pub use search::SearchOutcome;

/// Characters kept from the first message when naming a thread
pub const TITLE_BUDGET: usize = 50;

/// Characters shown of the last message in a thread listing
pub const PREVIEW_BUDGET: usize = 100;

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub auto_categorize: bool,
    pub history_limit: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            auto_categorize: false,
            history_limit: 50,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn PersistenceClient>,
    gateway: Gateway,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn PersistenceClient>, gateway: Gateway, settings: OrchestratorSettings) -> Self {
        Self {
            store,
            gateway,
            settings,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn gateway_backends(&self) -> Vec<String> {
        self.gateway
            .backend_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
