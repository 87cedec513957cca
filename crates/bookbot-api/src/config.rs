use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub openai_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Usually supplied through CHAT_MODEL
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
    pub timeout_secs: Option<u64>,
}

impl From<LlmConfig> for bookbot_graph::LLMConfig {
    fn from(config: LlmConfig) -> Self {
        bookbot_graph::LLMConfig::new(config.model).with_max_tokens(config.max_tokens)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Optional log file, always written at DEBUG level
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    bookbot_graph::types::DEFAULT_MAX_TOKENS
}

fn default_max_tool_rounds() -> usize {
    bookbot_graph::types::DEFAULT_MAX_TOOL_ROUNDS
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. BOOKBOT_-prefixed environment variables, `__` between levels
    ///    (e.g. BOOKBOT_SERVER__PORT=9000)
    /// 4. CHAT_MODEL, OPENAI_API_KEY, OPENAI_BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BOOKBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg: Config = builder.build()?.try_deserialize()?;
        cfg.with_env(|key| std::env::var(key).ok())
    }

    /// Deadline for one HTTP request
    ///
    /// Never shorter than a full turn: one completion per tool round plus the
    /// final one, each bounded by `llm.timeout_secs`.
    pub fn request_timeout(&self) -> Duration {
        let full_turn = self.llm.timeout_secs.map_or(0, |secs| {
            secs.saturating_mul(self.llm.max_tool_rounds as u64 + 1)
        });
        Duration::from_secs(self.server.request_timeout_secs.max(full_turn))
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Apply the values that only come from the process environment
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(model) = lookup("CHAT_MODEL").filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Message(
                "CHAT_MODEL environment variable is required".to_string(),
            ));
        }

        self.openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
            })?;

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.is_empty()) {
            self.openai_base_url = Some(url);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TOML: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [cors]
        enabled = true
        origins = ["http://localhost:3000"]

        [llm]
        max_tokens = 1024

        [database]
        path = "data/books_data.db"

        [logging]
        level = "debug"
        format = "json"
    "#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_structure() {
        let config: Config = toml::from_str(TOML).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.llm.max_tool_rounds, 10);
        assert_eq!(config.database.path, "data/books_data.db");
    }

    #[test]
    fn request_timeout_covers_a_full_turn() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.logging.file, None);

        config.llm.timeout_secs = Some(60);
        assert_eq!(config.request_timeout(), Duration::from_secs(60 * 11));

        config.llm.max_tool_rounds = 0;
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn default_toml_is_valid() {
        let config = Config::from_file(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/default.toml"),
        )
        .unwrap();
        assert_eq!(config.llm.max_tool_rounds, 10);
        assert!(config.request_timeout() >= Duration::from_secs(60 * 11));
        assert!(config.logging.file.is_some());
    }

    #[test]
    fn chat_model_and_key_come_from_env() {
        let config: Config = toml::from_str(TOML).unwrap();
        let config = config
            .with_env(env(&[
                ("CHAT_MODEL", "gpt-4o-mini"),
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_BASE_URL", "http://localhost:1234/v1"),
            ]))
            .unwrap();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url.as_deref(), Some("http://localhost:1234/v1"));
    }

    #[test]
    fn missing_model_is_fatal() {
        let config: Config = toml::from_str(TOML).unwrap();
        let err = config
            .with_env(env(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHAT_MODEL"));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let config: Config = toml::from_str(TOML).unwrap();
        let err = config
            .with_env(env(&[("CHAT_MODEL", "gpt-4o-mini")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn file_model_is_kept_without_override() {
        let mut config: Config = toml::from_str(TOML).unwrap();
        config.llm.model = "gpt-4o".to_string();
        let config = config
            .with_env(env(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
    }
}
