use config::{Config as ConfigLoader, ConfigError, File};
use lumen_llm::ProviderConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoDbConfig {
    pub database: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "lumen".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Fallback order; names are "gemini" and "openai"
    pub providers: Vec<String>,
    pub openai_model: String,
    pub gemini_model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            providers: vec!["gemini".to_string(), "openai".to_string()],
            openai_model: "gpt-5".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Classify queries that arrive without a category
    pub auto_categorize: bool,
    pub history_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            auto_categorize: false,
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header the identity proxy uses to forward the caller id
    pub user_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-user-id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment variables that override a config key
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("MONGODB_DATABASE", "mongodb.database"),
    ("LLM_OPENAI_MODEL", "llm.openai_model"),
    ("LLM_GEMINI_MODEL", "llm.gemini_model"),
    ("LLM_TIMEOUT_SECS", "llm.timeout_secs"),
    ("SEARCH_AUTO_CATEGORIZE", "search.auto_categorize"),
    ("SEARCH_HISTORY_LIMIT", "search.history_limit"),
    ("AUTH_USER_HEADER", "auth.user_header"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. Built-in defaults
    /// 2. config/default.toml
    /// 3. config/{ENV}.toml (if ENV is set)
    /// 4. Environment variables (SERVER_PORT, LLM_PROVIDERS, LOG_LEVEL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env_non_empty(var))?;
        }
        if let Some(providers) = env_non_empty("LLM_PROVIDERS") {
            let providers: Vec<String> = providers
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            builder = builder.set_override("llm.providers", providers)?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.mongodb_uri = env_non_empty("MONGODB_URI");
        cfg.gemini_api_key = env_non_empty("GEMINI_API_KEY");
        cfg.openai_api_key = ["OPENAI_API_KEY", "OPENAI_KEY", "API_KEY"]
            .into_iter()
            .find_map(env_non_empty);

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Provider chain in configured order, skipping providers without a key
    pub fn provider_configs(&self) -> Vec<ProviderConfig> {
        self.llm
            .providers
            .iter()
            .filter_map(|name| {
                let config = match name.as_str() {
                    "gemini" => self
                        .gemini_api_key
                        .as_ref()
                        .map(|key| ProviderConfig::gemini(key, &self.llm.gemini_model)),
                    "openai" => self
                        .openai_api_key
                        .as_ref()
                        .map(|key| ProviderConfig::openai(key, &self.llm.openai_model)),
                    other => {
                        tracing::warn!(provider = %other, "Ignoring unknown LLM provider");
                        return None;
                    }
                };
                if config.is_none() {
                    tracing::info!(provider = %name, "No API key set; provider disabled");
                }
                config.map(|c| c.with_timeout_secs(self.llm.timeout_secs))
            })
            .collect()
    }
}
