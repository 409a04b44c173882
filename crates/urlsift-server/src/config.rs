//! Configuration file parsing for the server.
//!
//! Loads bind settings, the LLM provider, pipeline tuning, the routing
//! file and strategy routes from TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use urlsift_extractor::PipelineConfig;
use urlsift_llm::config::OPENROUTER_BASE_URL;
use urlsift_llm::LlmConfig;
use urlsift_router::{MatcherOptions, PatternType};

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A section failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// JSON routing table loaded at startup
    #[serde(default)]
    pub routing_file: Option<PathBuf>,

    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// URL rules selecting the single strategy for `/extract`
    #[serde(default)]
    pub strategy_routes: Vec<StrategyRouteConfig>,
}

/// One strategy routing rule
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyRouteConfig {
    /// URL pattern
    pub pattern: String,

    /// How the pattern is interpreted
    pub pattern_type: PatternType,

    /// Registered strategy name (e.g., "crypto")
    pub strategy: String,

    /// Higher priorities are checked first
    #[serde(default)]
    pub priority: i32,

    /// Matcher switches
    #[serde(default)]
    pub matcher_options: MatcherOptions,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            routing_file: None,
            llm: LlmConfig::openai("test-key").with_base_url("http://127.0.0.1:9"),
            pipeline: PipelineConfig::default(),
            strategy_routes: Vec::new(),
        }
    }

    /// Fill the API key, model and base URL from the environment
    ///
    /// A key already present in the file wins; `URLSIFT_LLM_MODEL` and
    /// `URLSIFT_LLM_BASE_URL` always override.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.is_empty() {
            let from_env = LlmConfig::from_lookup(&lookup);
            self.llm.api_key = from_env.api_key;
            // The env key picks the provider unless the file chose one
            if self.llm.base_url == OPENROUTER_BASE_URL {
                self.llm.base_url = from_env.base_url;
            }
        }
        if let Some(model) = lookup("URLSIFT_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(base_url) = lookup("URLSIFT_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address cannot be empty".to_string()));
        }
        self.llm
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[llm] {}", e)))?;
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[pipeline] {}", e)))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.routing_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            routing_file = "config/routes.json"

            [llm]
            api_key = "sk-test"
            base_url = "https://api.openai.com/v1"
            model = "gpt-4o"

            [pipeline]
            max_content_chars = 20000

            [pipeline.pricing."gpt-4o"]
            prompt_per_million = 2.5
            completion_per_million = 10.0

            [[strategy_routes]]
            pattern = "coindesk.com"
            pattern_type = "domain"
            strategy = "crypto"
            priority = 10
            matcher_options = { include_subdomains = true }
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.routing_file, Some(PathBuf::from("config/routes.json")));
        assert_eq!(config.llm.resolved_model(), "gpt-4o");
        assert_eq!(config.pipeline.max_content_chars, 20_000);
        assert_eq!(config.pipeline.fallback_strategy, "general");
        assert_eq!(config.pipeline.pricing["gpt-4o"].completion_per_million, 10.0);
        assert_eq!(config.strategy_routes.len(), 1);
        assert_eq!(config.strategy_routes[0].pattern_type, PatternType::Domain);
        assert!(config.strategy_routes[0].matcher_options.include_subdomains);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.strategy_routes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_rejects_invalid_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nmax_content_chars = 0").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.starts_with("[pipeline]")));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServerConfig::from_file("/nonexistent/urlsift.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("URLSIFT_LLM_MODEL", "gpt-4o"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let mut config: ServerConfig = toml::from_str("").unwrap();
        config.apply_env(lookup);
        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.model.as_deref(), Some("gpt-4o"));

        let mut config = ServerConfig::default_test_config();
        config.apply_env(lookup);
        assert_eq!(config.llm.api_key, "test-key");
    }
}
