//! LLM-backed extraction strategy

use crate::error::ExtractorError;
use crate::parser::parse_extraction;
use crate::prompt::{build_system_message, build_user_message};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};
use urlsift_domain::traits::ExtractionStrategy;
use urlsift_domain::{ContentType, ExtractionResult};
use urlsift_llm::{ChatMessage, ChatRequest, LlmProvider};

/// Default maximum page content sent to the model (characters)
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 50_000;

/// Extraction strategy that asks an LLM for a JSON object
///
/// One call per extraction, no retry: transient failures surface to the
/// caller.
pub struct LlmExtractionStrategy<L: LlmProvider> {
    name: String,
    category: ContentType,
    instruction: Option<String>,
    schema: Option<Value>,
    llm: L,
    max_content_chars: usize,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl<L: LlmProvider> LlmExtractionStrategy<L> {
    /// Create a strategy with no default instruction or schema
    pub fn new(name: impl Into<String>, category: ContentType, llm: L) -> Self {
        Self {
            name: name.into(),
            category,
            instruction: None,
            schema: None,
            llm,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the default instruction
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Set the default schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Cap the page content sent to the model
    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.max_content_chars = max_content_chars;
        self
    }

    /// Override the provider's sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Override the provider's completion budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The LLM provider
    pub fn llm(&self) -> &L {
        &self.llm
    }
}

#[async_trait]
impl<L: LlmProvider> ExtractionStrategy for LlmExtractionStrategy<L> {
    type Error = ExtractorError;

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ContentType {
        self.category
    }

    fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    async fn extract(
        &self,
        url: &str,
        content: &str,
        instruction: Option<&str>,
        schema: Option<&Value>,
    ) -> Result<ExtractionResult, ExtractorError> {
        let instruction = instruction
            .or(self.instruction.as_deref())
            .ok_or_else(|| ExtractorError::Config("instruction is required".to_string()))?;
        let schema = schema.or(self.schema.as_ref());

        let started = Instant::now();
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(build_system_message(instruction, schema)),
                ChatMessage::user(build_user_message(url, content, self.max_content_chars)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_mode: true,
        };

        debug!(
            "Strategy '{}' calling {} for {} ({} chars)",
            self.name,
            self.llm.model(),
            url,
            content.len()
        );
        let completion = self.llm.complete(&request).await?;
        let mut result = parse_extraction(&completion.content)?;

        // Values the model put in the body itself win
        let model = completion
            .model
            .unwrap_or_else(|| self.llm.model().to_string());
        result.set_metadata_if_absent("model", model);
        if let Some(usage) = completion.usage {
            result.set_metadata_if_absent(
                "usage",
                json!({
                    "prompt_tokens": usage.prompt_tokens,
                    "completion_tokens": usage.completion_tokens,
                    "total_tokens": usage.total_tokens,
                }),
            );
        }

        let elapsed = started.elapsed().as_secs_f64();
        result.set_metadata("timestamp", chrono::Utc::now().to_rfc3339());
        result.set_metadata("performance", json!({ "extraction_time": elapsed }));

        info!(
            "Strategy '{}' extracted {} fields from {} in {:.2}s",
            self.name,
            result.as_map().len().saturating_sub(1),
            url,
            elapsed
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use urlsift_llm::MockProvider;

    fn strategy(llm: MockProvider) -> LlmExtractionStrategy<MockProvider> {
        LlmExtractionStrategy::new("news", ContentType::News, llm)
            .with_instruction("Extract the article.")
    }

    #[tokio::test]
    async fn test_missing_instruction_is_config_error() {
        let llm = MockProvider::new("{}");
        let strategy = LlmExtractionStrategy::new("bare", ContentType::General, llm.clone());

        let result = strategy.extract("https://a.com", "text", None, None).await;
        assert!(matches!(
            result,
            Err(ExtractorError::Config(ref m)) if m == "instruction is required"
        ));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_arguments_override_defaults() {
        let llm = MockProvider::new(r#"{"title": "t"}"#);
        let strategy = strategy(llm.clone()).with_schema(json!({"title": "default-schema"}));

        let schema = json!({"title": "explicit-schema"});
        strategy
            .extract("https://a.com", "text", Some("Explicit instruction."), Some(&schema))
            .await
            .unwrap();

        let request = llm.last_request().unwrap();
        assert!(request.json_mode);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.starts_with("Explicit instruction."));
        assert!(request.messages[0].content.contains("explicit-schema"));
        assert!(!request.messages[0].content.contains("default-schema"));
        assert_eq!(request.messages[1].role, "user");
    }

    #[tokio::test]
    async fn test_metadata_is_attached() {
        let llm =
            MockProvider::new(r#"{"title": "t", "content": "c"}"#).with_model("provider-model");
        let result = strategy(llm).extract("https://a.com", "text", None, None).await.unwrap();

        let metadata = result.metadata().unwrap();
        assert_eq!(metadata["model"], "provider-model");
        assert_eq!(metadata["usage"]["total_tokens"], 15);
        assert!(metadata["timestamp"].as_str().unwrap().contains('T'));
        assert!(metadata["performance"]["extraction_time"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_body_metadata_is_not_overwritten() {
        let llm = MockProvider::new(
            r#"{"title": "t", "_metadata": {"model": "self-reported", "usage": {"total_tokens": 1}}}"#,
        );
        let result = strategy(llm).extract("https://a.com", "text", None, None).await.unwrap();

        assert_eq!(result.model(), Some("self-reported"));
        assert_eq!(result.usage().map(|u| u.total_tokens), Some(1));
    }

    #[tokio::test]
    async fn test_missing_usage_is_not_invented() {
        let llm = MockProvider::new(r#"{"title": "t"}"#).without_usage();
        let result = strategy(llm).extract("https://a.com", "text", None, None).await.unwrap();
        assert!(result.usage().is_none());
    }

    #[tokio::test]
    async fn test_error_kinds_are_distinct() {
        let llm = MockProvider::new("not json at all");
        llm.push_status(502, "bad gateway");
        llm.push_connection_error();
        let strategy = strategy(llm);

        let first = strategy.extract("https://a.com", "x", None, None).await;
        assert!(matches!(
            first,
            Err(ExtractorError::ApiResponse { status: 502, ref body }) if body == "bad gateway"
        ));

        let second = strategy.extract("https://a.com", "x", None, None).await;
        assert!(matches!(second, Err(ExtractorError::ApiConnection(_))));

        let third = strategy.extract("https://a.com", "x", None, None).await;
        assert!(matches!(third, Err(ExtractorError::ContentParse(_))));
    }

    #[tokio::test]
    async fn test_content_is_truncated() {
        let llm = MockProvider::new(r#"{"title": "t"}"#);
        let strategy = strategy(llm.clone()).with_max_content_chars(10);

        let long = "a".repeat(1000);
        strategy.extract("https://a.com", &long, None, None).await.unwrap();

        let request = llm.last_request().unwrap();
        assert!(request.messages[1].content.len() < 200);
        assert!(request.messages[1].content.contains("truncated"));
    }
}
