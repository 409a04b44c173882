//! Configuration for LLM providers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenRouter API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model on OpenRouter (free tier, JSON capable)
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-exp:free";

/// Default model on any other OpenAI-compatible provider
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Configuration for an OpenAI-compatible chat-completion provider
///
/// # Examples
///
/// ```
/// use urlsift_llm::LlmConfig;
///
/// let config = LlmConfig::openrouter("sk-or-test");
/// assert!(config.is_openrouter());
/// assert_eq!(config.resolved_model(), urlsift_llm::config::DEFAULT_OPENROUTER_MODEL);
///
/// let config = LlmConfig::openai("sk-test").with_model("gpt-4o");
/// assert_eq!(config.resolved_model(), "gpt-4o");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Bearer token
    #[serde(default)]
    pub api_key: String,

    /// API base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model override; a provider-specific default applies when unset
    #[serde(default)]
    pub model: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sent as `HTTP-Referer` to OpenRouter
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Sent as `X-Title` to OpenRouter
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

fn default_base_url() -> String {
    OPENROUTER_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_app_url() -> String {
    "https://github.com/your-org/urlsift".to_string()
}

fn default_app_title() -> String {
    "urlsift".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            app_url: default_app_url(),
            app_title: default_app_title(),
        }
    }
}

impl LlmConfig {
    /// Timeout of a single chat-completion call (seconds)
    ///
    /// Fixed per deployment; callers cannot override it per call.
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// OpenRouter preset
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            ..Self::default()
        }
    }

    /// OpenAI preset
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            ..Self::default()
        }
    }

    /// Set the model override
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(Self::REQUEST_TIMEOUT_SECS)
    }

    /// Whether the base URL points at OpenRouter
    pub fn is_openrouter(&self) -> bool {
        self.base_url.contains("openrouter.ai")
    }

    /// The model requests are sent to
    pub fn resolved_model(&self) -> String {
        match &self.model {
            Some(model) if !model.trim().is_empty() => model.clone(),
            _ if self.is_openrouter() => DEFAULT_OPENROUTER_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    /// Full chat-completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build a configuration from environment variables
    ///
    /// `OPENROUTER_API_KEY` selects OpenRouter, otherwise `OPENAI_API_KEY`
    /// selects OpenAI. `URLSIFT_LLM_BASE_URL` and `URLSIFT_LLM_MODEL`
    /// override the base URL and model.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(key) = lookup("OPENROUTER_API_KEY") {
            Self::openrouter(key)
        } else if let Some(key) = lookup("OPENAI_API_KEY") {
            Self::openai(key)
        } else {
            Self::default()
        };

        if let Some(base_url) = lookup("URLSIFT_LLM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("URLSIFT_LLM_MODEL") {
            config.model = Some(model);
        }
        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
