//! The answer gateway: a prioritized chain of generation backends.
//!
//! Every public operation is total. A backend that errors, times out, or
//! returns unusable output is logged and skipped; when the chain runs out the
//! gateway answers with a static fallback. Callers never handle errors here.

use std::sync::Arc;

use lumen_types::{Category, Source};
use serde::{Deserialize, Serialize};

use crate::config::{ClientFactory, ProviderConfig};
use crate::parse;
use crate::prompts;
use crate::traits::{ChatClient, ChatOptions, ChatRequest};
use crate::types::Message;

/// Returned when no backend is configured at all
pub const UNAVAILABLE_ANSWER: &str = "AI search is currently unavailable. Please configure an AI provider API key to enable AI-powered responses.";

/// Returned when every configured backend failed
pub const DEGRADED_ANSWER: &str = "I'm experiencing technical difficulties right now. Please try your search again in a moment.";

/// A generated answer with its cited sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub content: String,
    pub sources: Vec<Source>,
}

impl Answer {
    fn placeholder(content: &str) -> Self {
        Self {
            content: content.to_string(),
            sources: Vec::new(),
        }
    }
}

/// One link in the fallback chain
#[derive(Clone)]
pub struct Backend {
    name: String,
    model: String,
    client: Arc<dyn ChatClient>,
}

impl Backend {
    pub fn new(name: impl Into<String>, model: impl Into<String>, client: Arc<dyn ChatClient>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, messages: Vec<Message>, options: ChatOptions) -> anyhow::Result<String> {
        let request = ChatRequest::new(self.model.clone(), messages).with_options(options);
        let response = self.client.chat(request).await?;
        response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} returned an empty completion", self.name))
    }
}

#[derive(Clone, Default)]
pub struct Gateway {
    backends: Vec<Backend>,
}

impl Gateway {
    /// Backends are tried in the order given
    pub fn new(backends: Vec<Backend>) -> Self {
        Self { backends }
    }

    /// A gateway with no backends; every call returns its static fallback
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Build the chain from provider configs, skipping any that fail to build
    pub fn from_providers(providers: &[ProviderConfig]) -> Self {
        let backends = providers
            .iter()
            .filter_map(|config| match ClientFactory::create_client(config) {
                Ok(client) => Some(Backend::new(
                    config.provider_type().to_string(),
                    config.model.clone(),
                    client,
                )),
                Err(e) => {
                    tracing::warn!(
                        provider = %config.provider_type(),
                        error = %e,
                        "Skipping provider that failed to initialize"
                    );
                    None
                }
            })
            .collect();
        Self::new(backends)
    }

    pub fn is_configured(&self) -> bool {
        !self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(Backend::name).collect()
    }

    /// Generate an answer with sources for a query
    pub async fn generate_answer(&self, query: &str, category: Option<&str>) -> Answer {
        if !self.is_configured() {
            return Answer::placeholder(UNAVAILABLE_ANSWER);
        }

        let system = prompts::answer_system_prompt(category);
        for backend in &self.backends {
            let messages = vec![Message::system(system.clone()), Message::human(query)];
            let options = ChatOptions::new().temperature(0.7).max_tokens(2000).json();

            match backend.complete(messages, options).await {
                Ok(raw) => match parse::parse_answer(&raw) {
                    Some(answer) => {
                        tracing::debug!(backend = %backend.name(), sources = answer.sources.len(), "Answer generated");
                        return answer;
                    }
                    None => {
                        tracing::warn!(backend = %backend.name(), "Backend returned a malformed answer, trying next");
                    }
                },
                Err(e) => {
                    tracing::warn!(backend = %backend.name(), error = %e, "Answer generation failed, trying next");
                }
            }
        }

        tracing::error!("All answer backends failed; returning degraded answer");
        Answer::placeholder(DEGRADED_ANSWER)
    }

    /// Suggest 3-5 completions for a partial query
    pub async fn generate_suggestions(&self, partial: &str) -> Vec<String> {
        for backend in &self.backends {
            let messages = vec![
                Message::system(prompts::SUGGESTIONS_SYSTEM_PROMPT),
                Message::human(prompts::suggestions_user_prompt(partial)),
            ];
            let options = ChatOptions::new().temperature(0.8).max_tokens(200).json();

            match backend.complete(messages, options).await {
                Ok(raw) => match parse::parse_suggestions(&raw) {
                    Some(suggestions) => return suggestions,
                    None => {
                        tracing::warn!(backend = %backend.name(), "Backend returned no usable suggestions, trying next");
                    }
                },
                Err(e) => {
                    tracing::warn!(backend = %backend.name(), error = %e, "Suggestion generation failed, trying next");
                }
            }
        }

        parse::fallback_suggestions(partial)
    }

    /// Classify a query into the fixed category set
    ///
    /// The first backend that answers decides, even when its answer is "none";
    /// only transport failures fall through to the next backend.
    pub async fn classify_category(&self, query: &str) -> Option<Category> {
        for backend in &self.backends {
            let messages = vec![
                Message::system(prompts::CLASSIFY_SYSTEM_PROMPT),
                Message::human(query),
            ];
            let options = ChatOptions::new().temperature(0.3).max_tokens(50).json();

            match backend.complete(messages, options).await {
                Ok(raw) => {
                    let category = parse::parse_category(&raw);
                    if category.is_none() {
                        tracing::debug!(backend = %backend.name(), raw = %raw, "Classification did not match a known category");
                    }
                    return category;
                }
                Err(e) => {
                    tracing::warn!(backend = %backend.name(), error = %e, "Classification failed, trying next");
                }
            }
        }

        None
    }
}
