//! OpenAI-compatible chat-completion provider
//!
//! Works with any endpoint speaking the OpenAI chat-completions protocol.
//! OpenRouter and OpenAI share the request shape; OpenRouter additionally
//! receives `HTTP-Referer` and `X-Title` headers.
//!
//! # Examples
//!
//! ```no_run
//! use urlsift_llm::{ChatCompletionsProvider, LlmConfig};
//!
//! let provider = ChatCompletionsProvider::new(LlmConfig::openrouter("sk-or-..."))?;
//! # Ok::<(), urlsift_llm::LlmError>(())
//! ```

use crate::{ChatCompletion, ChatMessage, ChatRequest, LlmConfig, LlmError, LlmProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use urlsift_domain::TokenUsage;

/// Provider for OpenAI-compatible chat-completion APIs
pub struct ChatCompletionsProvider {
    config: LlmConfig,
    model: String,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let model = config.resolved_model();
        Ok(Self {
            config,
            model,
            client,
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Headers only OpenRouter receives
    fn provider_headers(&self) -> Vec<(&'static str, String)> {
        if self.config.is_openrouter() {
            vec![
                ("HTTP-Referer", self.config.app_url.clone()),
                ("X-Title", self.config.app_title.clone()),
            ]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    fn model(&self) -> &str {
        &self.model
    }

    /// Issue one POST to `{base_url}/chat/completions`
    ///
    /// # Errors
    ///
    /// - [`LlmError::Connection`] if the endpoint cannot be reached
    /// - [`LlmError::Response`] on a non-2xx status
    /// - [`LlmError::InvalidResponse`] if a 2xx body is not a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        let body = CompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(self.config.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut builder = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body);
        for (name, value) in self.provider_headers() {
            builder = builder.header(name, value);
        }

        debug!("POST {} (model {})", self.config.endpoint(), self.model);

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Connection(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Connection(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Response {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Response has no choices[0].message.content".to_string())
            })?;

        Ok(ChatCompletion {
            content,
            model: parsed.model,
            usage: parsed.usage,
        })
    }
}
