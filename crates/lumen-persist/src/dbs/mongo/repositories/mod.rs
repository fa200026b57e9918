pub mod catalog;
pub mod conversation;
pub mod message;
pub mod search;
pub mod user;

pub use catalog::{MongoSpaceRepository, MongoTopicRepository};
pub use conversation::MongoConversationRepository;
pub use message::MongoMessageRepository;
pub use search::MongoSearchRepository;
pub use user::MongoUserRepository;

/// Driver limit for `limit`, or `None` when nothing should be returned
///
/// The driver reads a limit of 0 as unbounded, so callers skip the query
/// instead. Values past `i64::MAX` saturate.
pub(crate) fn driver_limit(limit: usize) -> Option<i64> {
    (limit > 0).then(|| i64::try_from(limit).unwrap_or(i64::MAX))
}

/// Escape regex metacharacters so user text matches literally
pub(crate) fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
