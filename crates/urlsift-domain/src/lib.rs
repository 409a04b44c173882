//! urlsift Domain Layer
//!
//! Shared value types and trait seams for the URL routing, LLM extraction,
//! schema validation and metrics crates.
//!
//! ## Key Concepts
//!
//! - **ExtractorConfig**: one extractor reference plus the target group its output fills
//! - **ContentType**: closed category driving schema selection
//! - **ExtractionResult**: schema-defined fields plus an `_metadata` object
//! - **ValidationError**: a single schema violation, critical or recoverable
//!
//! ## Architecture
//!
//! This crate holds no I/O. Infrastructure (HTTP, file persistence, metrics
//! export) lives in the other crates and plugs in through the traits in
//! [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content_type;
pub mod extractor;
pub mod result;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use content_type::ContentType;
pub use extractor::ExtractorConfig;
pub use result::{ExtractionResult, TokenUsage, METADATA_KEY};
pub use validation::ValidationError;
