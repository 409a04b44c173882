//! urlsift LLM Provider Layer
//!
//! Chat-completion providers used by the extraction strategies.
//!
//! # Architecture
//!
//! Providers implement the async [`LlmProvider`] trait: one chat request in,
//! one completion (content, model, token usage) out. There is no retry at
//! this layer; transient failures surface to the caller.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible HTTP API (OpenRouter, OpenAI, ...)
//!
//! # Examples
//!
//! ```
//! use urlsift_llm::{ChatMessage, ChatRequest, LlmProvider, MockProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new(r#"{"title": "Hello"}"#);
//! let request = ChatRequest::new(vec![ChatMessage::user("extract")]);
//! let completion = provider.complete(&request).await.unwrap();
//! assert_eq!(completion.content, r#"{"title": "Hello"}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use urlsift_domain::TokenUsage;

pub use config::LlmConfig;
pub use openai::ChatCompletionsProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure reaching the endpoint
    #[error("Communication error: {0}")]
    Connection(String),

    /// Non-2xx HTTP status
    #[error("API returned HTTP {status}: {body}")]
    Response {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// 2xx response that is not a chat completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// One message of a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Conversation, system message first
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
    /// Completion token cap; provider default when `None`
    pub max_tokens: Option<u32>,
    /// Ask for a JSON object response
    pub json_mode: bool,
}

impl ChatRequest {
    /// Create a JSON-mode request using provider defaults
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
            json_mode: true,
        }
    }
}

/// A chat completion returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    /// `choices[0].message.content`
    pub content: String,
    /// Model that served the request, as reported by the provider
    pub model: Option<String>,
    /// Token usage, as reported by the provider
    pub usage: Option<TokenUsage>,
}

/// An LLM backend able to answer chat requests
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model the provider sends requests to
    fn model(&self) -> &str;

    /// Issue a single chat-completion call
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError>;
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    fn model(&self) -> &str {
        (**self).model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        (**self).complete(request).await
    }
}

/// Scripted outcome of a mock call
#[derive(Debug, Clone)]
enum MockReply {
    Content(String),
    Status(u16, String),
    Unreachable,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured completions without making any network calls.
/// Queued replies are consumed first; afterwards every call gets the
/// default content.
///
/// # Examples
///
/// ```
/// use urlsift_llm::{ChatMessage, ChatRequest, LlmProvider, MockProvider};
///
/// # async fn example() {
/// let provider = MockProvider::new("{}");
/// provider.push_response(r#"{"a": 1}"#);
/// let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
/// assert_eq!(provider.complete(&request).await.unwrap().content, r#"{"a": 1}"#);
/// assert_eq!(provider.complete(&request).await.unwrap().content, "{}");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    usage: Option<TokenUsage>,
    queue: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed content for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock-model".to_string(),
            default_response: response.into(),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report a different model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Report no token usage
    pub fn without_usage(mut self) -> Self {
        self.usage = None;
        self
    }

    /// Queue a content for the next call
    pub fn push_response(&self, content: impl Into<String>) {
        lock(&self.queue).push_back(MockReply::Content(content.into()));
    }

    /// Queue a non-2xx response for the next call
    pub fn push_status(&self, status: u16, body: impl Into<String>) {
        lock(&self.queue).push_back(MockReply::Status(status, body.into()));
    }

    /// Queue a transport failure for the next call
    pub fn push_connection_error(&self) {
        lock(&self.queue).push_back(MockReply::Unreachable);
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<ChatRequest> {
        lock(&self.requests).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        lock(&self.requests).push(request.clone());

        let reply = lock(&self.queue)
            .pop_front()
            .unwrap_or_else(|| MockReply::Content(self.default_response.clone()));

        match reply {
            MockReply::Content(content) => Ok(ChatCompletion {
                content,
                model: Some(self.model.clone()),
                usage: self.usage,
            }),
            MockReply::Status(status, body) => Err(LlmError::Response { status, body }),
            MockReply::Unreachable => {
                Err(LlmError::Connection("mock endpoint unreachable".to_string()))
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
