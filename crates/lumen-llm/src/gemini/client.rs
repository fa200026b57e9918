// Google Gemini client implementation (generateContent REST API)

use crate::config::GeminiConfig;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, ResponseFormat, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, no SDK)
///
/// Gemini differs from OpenAI-style chat APIs:
/// - URL: {base}/models/{model}:generateContent
/// - Auth header: x-goog-api-key instead of Authorization: Bearer
/// - System prompts travel in `systemInstruction`, assistant turns use role `model`
#[derive(Debug)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&GeminiConfig::new(api_key))
    }

    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&config.api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Build generateContent request payload
    fn build_request(&self, messages: &[Message], options: &ChatOptions) -> Value {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.is_system())
            .map(|m| m.content())
            .collect();

        let contents: Vec<Value> = messages
            .iter()
            .filter_map(|m| {
                let role = match m {
                    Message::System { .. } => return None,
                    Message::Human { .. } => "user",
                    Message::AI { .. } => "model",
                };
                Some(serde_json::json!({
                    "role": role,
                    "parts": [{ "text": m.content() }],
                }))
            })
            .collect();

        let mut request = Map::new();
        request.insert("contents".to_string(), Value::from(contents));

        if !system_text.is_empty() {
            request.insert(
                "systemInstruction".to_string(),
                serde_json::json!({ "parts": [{ "text": system_text.join("\n\n") }] }),
            );
        }

        let mut generation_config = Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        if options.response_format == ResponseFormat::Json {
            generation_config.insert(
                "responseMimeType".to_string(),
                Value::from("application/json"),
            );
        }
        if !generation_config.is_empty() {
            request.insert("generationConfig".to_string(), Value::Object(generation_config));
        }

        Value::Object(request)
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_request(&request.messages, &request.options);

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, request.model))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let raw: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let candidate = raw.candidates.first();
        let content = candidate.and_then(|c| c.content.as_ref()).map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        });

        Ok(ChatResponse {
            content: content.filter(|text| !text.is_empty()),
            usage: raw.usage_metadata.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// GEMINI-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}
