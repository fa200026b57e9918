// Configuration layer for provider-agnostic LLM client creation
// This module provides a factory pattern for creating LLM clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::traits::ChatClient;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Type of LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Gemini,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAI => f.write_str("openai"),
            ProviderType::Gemini => f.write_str("gemini"),
        }
    }
}

/// Configuration for OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Configuration for Google Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL (optional, defaults to https://generativelanguage.googleapis.com/v1beta)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    OpenAI(OpenAIConfig),
    Gemini(GeminiConfig),
}

/// Complete provider configuration
///
/// The model travels with the provider because a fallback chain mixes
/// providers, each with its own model namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub model: String,
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            details: ProviderDetails::OpenAI(OpenAIConfig::new(api_key)),
        }
    }

    /// Create Gemini provider config
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            details: ProviderDetails::Gemini(GeminiConfig::new(api_key)),
        }
    }

    /// Apply a request timeout to whichever provider this is
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.details = match self.details {
            ProviderDetails::OpenAI(c) => ProviderDetails::OpenAI(c.with_timeout_secs(secs)),
            ProviderDetails::Gemini(c) => ProviderDetails::Gemini(c.with_timeout_secs(secs)),
        };
        self
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self.details {
            ProviderDetails::OpenAI(_) => ProviderType::OpenAI,
            ProviderDetails::Gemini(_) => ProviderType::Gemini,
        }
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_client(config: &ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        match &config.details {
            ProviderDetails::OpenAI(openai_config) => {
                let client = crate::openai::OpenAIClient::from_config(openai_config)?;
                Ok(Arc::new(client))
            }
            ProviderDetails::Gemini(gemini_config) => {
                let client = crate::gemini::GeminiClient::from_config(gemini_config)?;
                Ok(Arc::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config() {
        let config = ProviderConfig::openai("test-key", "gpt-5");
        assert_eq!(config.provider_type(), ProviderType::OpenAI);
        assert_eq!(config.model, "gpt-5");
    }

    #[test]
    fn test_gemini_config() {
        let config = ProviderConfig::gemini("test-key", "gemini-2.5-flash");
        assert_eq!(config.provider_type(), ProviderType::Gemini);
    }

    #[test]
    fn test_timeout_applies_to_details() {
        let config = ProviderConfig::gemini("k", "m").with_timeout_secs(5);
        match config.details {
            ProviderDetails::Gemini(c) => assert_eq!(c.timeout_secs, 5),
            other => panic!("unexpected provider: {:?}", other),
        }
    }

    #[test]
    fn test_serde_roundtrip_keeps_provider() {
        let config = ProviderConfig::gemini("test-key", "gemini-2.5-flash");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"type\":\"gemini\""));

        let deserialized: ProviderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.provider_type(), ProviderType::Gemini);
        assert_eq!(deserialized.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_factory_builds_both_providers() {
        assert!(ClientFactory::create_client(&ProviderConfig::openai("k", "gpt-5")).is_ok());
        assert!(ClientFactory::create_client(&ProviderConfig::gemini("k", "gemini-2.5-flash")).is_ok());
    }
}
