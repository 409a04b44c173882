//! urlsift Extractor
//!
//! Turns web pages into schema-conformant JSON with an LLM.
//!
//! # Architecture
//!
//! ```text
//! URL → Router → Strategy → LLM → JSON → SchemaValidator → Metrics → caller
//! ```
//!
//! # Key Features
//!
//! - **LLM strategies**: one chat-completion call per extraction, JSON mode
//! - **Presets**: ready-made strategies for every content type
//! - **Explicit registry**: strategies are registered by name at startup
//! - **Two routing modes**: single strategy per URL, or fan-out to every
//!   routed extractor
//! - **Two-tier validation**: missing required data fails, everything else
//!   is defaulted and logged
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use urlsift_extractor::{register_presets, ExtractionPipeline, PipelineConfig, StrategyRegistry};
//! use urlsift_llm::{ChatCompletionsProvider, LlmConfig};
//! use urlsift_metrics::ExtractionMetrics;
//! use urlsift_schema::{SchemaRegistry, SchemaValidator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(ChatCompletionsProvider::new(LlmConfig::from_env())?);
//! let schemas = SchemaRegistry::new();
//! let config = PipelineConfig::default();
//!
//! let mut strategies = StrategyRegistry::new();
//! register_presets(&mut strategies, llm, &schemas, config.max_content_chars);
//!
//! let pipeline = ExtractionPipeline::new(
//!     config,
//!     strategies,
//!     SchemaValidator::new(schemas),
//!     Arc::new(ExtractionMetrics::new()),
//! )?;
//!
//! let result = pipeline
//!     .extract("https://example.com/story", "Page text...", None)
//!     .await?;
//! println!("{}", result.into_value());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod pipeline;
mod presets;
mod prompt;
mod registry;
mod strategy;


pub use config::{ModelPricing, PipelineConfig};
pub use error::ExtractorError;
pub use parser::parse_extraction;
pub use pipeline::{ExtractionPipeline, ExtractionReport, TargetedExtraction};
pub use presets::{default_instruction, preset, register_presets};
pub use prompt::{build_system_message, build_user_message, truncate_chars};
pub use registry::{DynStrategy, StrategyRegistry};
pub use strategy::{LlmExtractionStrategy, DEFAULT_MAX_CONTENT_CHARS};
