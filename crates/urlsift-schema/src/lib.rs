//! urlsift Schema
//!
//! Schema registry and validator for LLM extraction results.
//!
//! The registry provides:
//! - A base schema shared by every content type
//! - Per-content-type schemas merged onto the base
//! - Heuristic content-type detection from page content and URL
//!
//! The validator fills schema defaults into a result, validates it and
//! splits the findings into critical errors (missing required data) and
//! recoverable ones that are only logged.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use urlsift_domain::ExtractionResult;
//! use urlsift_schema::{SchemaRegistry, SchemaValidator};
//!
//! let validator = SchemaValidator::new(SchemaRegistry::new());
//! let raw = ExtractionResult::from_value(json!({
//!     "title": "Fed holds rates",
//!     "content": "The Federal Reserve left rates unchanged.",
//! }))
//! .unwrap();
//!
//! let enhanced = validator
//!     .validate_and_enhance(raw, "The Federal Reserve left rates unchanged.", None, Some("news"))
//!     .unwrap();
//! assert_eq!(enhanced.get("category"), Some(&json!("general")));
//! ```

#![warn(missing_docs)]

mod builtin;
mod detect;
mod error;
mod registry;
mod validator;

pub use builtin::{base_schema, builtin_schema};
pub use detect::detect_content_type;
pub use error::SchemaError;
pub use registry::{merge_schemas, SchemaRegistry};
pub use validator::SchemaValidator;
