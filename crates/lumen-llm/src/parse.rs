//! Turning raw provider output into typed results.
//!
//! Providers are asked for JSON but do not always comply: some wrap the JSON
//! in markdown code fences, some answer in prose. Every function here accepts
//! whatever came back and either extracts a usable value or reports `None`.

use lumen_types::{Category, Source};
use serde::Deserialize;
use serde_json::Value;

use crate::gateway::Answer;

pub const MIN_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) that follows the opening fence.
    // A first line that is not a bare word is already part of the body.
    let first_line = rest.split('\n').next().unwrap_or_default().trim();
    let body = if !first_line.is_empty() && first_line.chars().all(|c| c.is_ascii_alphabetic()) {
        &rest[rest.find('\n').map_or(rest.len(), |idx| idx + 1)..]
    } else {
        let after_word = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if after_word.trim_start().starts_with(['{', '[']) {
            after_word
        } else {
            rest
        }
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    sources: Option<Vec<Source>>,
}

/// Parse an answer; `None` means the output was empty or malformed
///
/// A JSON object must carry a non-empty `content`. Anything that is not a
/// JSON object is taken verbatim as the answer text with no sources.
pub fn parse_answer(raw: &str) -> Option<Answer> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value @ Value::Object(_)) => {
            let structured: StructuredAnswer = serde_json::from_value(value).ok()?;
            let content = structured
                .content
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())?;
            let sources = structured
                .sources
                .unwrap_or_default()
                .into_iter()
                .filter(|s| !s.is_blank())
                .collect();
            Some(Answer { content, sources })
        }
        _ => Some(Answer {
            content: cleaned.to_string(),
            sources: Vec::new(),
        }),
    }
}

/// Parse suggestions from a JSON array or a `{"suggestions": [...]}` object
///
/// Fewer than three usable entries counts as no answer.
pub fn parse_suggestions(raw: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(strip_code_fences(raw)).ok()?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("suggestions") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let suggestions: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    (suggestions.len() >= MIN_SUGGESTIONS).then_some(suggestions)
}

/// Validate a classification against the fixed category set
///
/// Accepts `{"category": "..."}`, a bare JSON string, or plain text.
/// Unrecognised labels, `null`, and prose all map to `None`.
pub fn parse_category(raw: &str) -> Option<Category> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => match map.get("category") {
            Some(Value::String(label)) => label.parse().ok(),
            _ => None,
        },
        Ok(Value::String(label)) => label.parse().ok(),
        Ok(_) => None,
        Err(_) => cleaned.parse().ok(),
    }
}

/// Templated suggestions used when no backend can produce any
pub fn fallback_suggestions(partial: &str) -> Vec<String> {
    let q = partial.trim();
    vec![
        format!("What is {}?", q),
        format!("How does {} work?", q),
        format!("Latest news about {}", q),
        format!("{} explained", q),
        format!("Best practices for {}", q),
    ]
    .into_iter()
    .take(3)
    .collect()
}
