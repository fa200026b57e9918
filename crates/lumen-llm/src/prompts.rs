//! Prompt templates sent to the generation backends.

/// System prompt for answer generation, optionally scoped to a category
pub fn answer_system_prompt(category: Option<&str>) -> String {
    let focus = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => format!("Focus your response on the {} category.\n\n", category),
        None => String::new(),
    };

    format!(
        r#"You are an AI assistant that provides accurate, informative responses to user queries.
{focus}Provide a comprehensive answer and include relevant sources. Format your response as JSON with this structure:
{{
  "content": "Your detailed response here",
  "sources": [
    {{
      "title": "Source title",
      "url": "https://example.com",
      "snippet": "Brief excerpt from the source"
    }}
  ]
}}

Make sure to:
1. Provide accurate, factual information
2. Include 3-5 relevant sources when possible
3. Keep the response comprehensive but concise
4. Use proper formatting and structure"#
    )
}

pub const SUGGESTIONS_SYSTEM_PROMPT: &str = r#"Generate 3-5 search suggestions based on the user's partial query.
The suggestions should be:
1. Related to the user's input
2. Complete, searchable questions or topics
3. Diverse and covering different angles

Respond with JSON format: {"suggestions": ["suggestion 1", "suggestion 2", "suggestion 3"]}"#;

pub fn suggestions_user_prompt(partial: &str) -> String {
    format!("Partial query: \"{}\"", partial)
}

pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"Categorize the following query into one of these categories:
- Finance
- Travel
- Shopping
- Academic
- Technology
- Health
- null (if it doesn't fit any category)

Respond with JSON format: {"category": "category_name"}"#;
