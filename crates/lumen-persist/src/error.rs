use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[cfg(feature = "mongodb")]
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PersistError {
    /// Caller errors (unknown ids) as opposed to backend faults
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::ConversationNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
