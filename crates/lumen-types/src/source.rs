use serde::{Deserialize, Serialize};

/// A cited reference attached to a generated answer
///
/// Providers are not trusted to return every field, so missing fields
/// deserialize to empty strings instead of rejecting the whole answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

impl Source {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// A source with neither a title nor a url carries nothing worth citing
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.url.trim().is_empty()
    }
}
