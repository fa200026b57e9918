pub mod dbs;
pub mod error;
pub mod models;
pub mod seed;
pub mod trait_client;

pub use dbs::memory::InMemoryStore;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use models::{
    Conversation, ConversationUpdate, Message, MessageRole, NewConversation, NewMessage,
    NewSearch, NewSpace, NewTrendingTopic, Search, SearchHistory, Space, TrendingTopic,
    UpsertUser, User,
};
pub use seed::seed_defaults;
pub use trait_client::PersistenceClient;
