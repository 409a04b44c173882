//! Trait definitions for external interactions
//!
//! These traits define the boundaries between routing/validation logic and
//! infrastructure. Implementations live in other crates or in the caller.

use crate::{ContentType, ExtractionResult};
use async_trait::async_trait;
use serde_json::Value;

/// Capability contract every extraction strategy implements
///
/// Strategies are registered explicitly at startup and looked up by
/// [`name`](ExtractionStrategy::name).
///
/// Implemented by the application layer (urlsift-extractor)
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Error type for extraction operations
    type Error;

    /// Unique registration name
    fn name(&self) -> &str;

    /// Content category the strategy is built for
    fn category(&self) -> ContentType;

    /// Default instruction, if any
    fn instruction(&self) -> Option<&str>;

    /// Default JSON schema, if any
    fn schema(&self) -> Option<&Value>;

    /// Extract structured data from page content
    ///
    /// Explicit `instruction`/`schema` arguments override the defaults.
    async fn extract(
        &self,
        url: &str,
        content: &str,
        instruction: Option<&str>,
        schema: Option<&Value>,
    ) -> Result<ExtractionResult, Self::Error>;
}

/// Fetches raw page content (markdown or text) for a URL
///
/// Provided by the crawling engine, which is outside this workspace.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Error type for fetch operations
    type Error;

    /// Fetch the page behind `url`
    async fn fetch(&self, url: &str) -> Result<String, Self::Error>;
}
