pub mod config;
pub mod gateway;
pub mod gemini;
pub mod openai;
pub mod parse;
pub mod prompts;
pub mod traits;
pub mod types;

pub use config::{ClientFactory, GeminiConfig, OpenAIConfig, ProviderConfig, ProviderType};
pub use gateway::{Answer, Backend, Gateway, DEGRADED_ANSWER, UNAVAILABLE_ANSWER};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, ResponseFormat, TokenUsage};
pub use types::Message;
