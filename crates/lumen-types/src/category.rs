use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed set of domains a query can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Finance,
    Travel,
    Shopping,
    Academic,
    Technology,
    Health,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Finance,
        Category::Travel,
        Category::Shopping,
        Category::Academic,
        Category::Technology,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "Finance",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Academic => "Academic",
            Category::Technology => "Technology",
            Category::Health => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive, surrounding whitespace and quotes ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(cleaned))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
