//! Error types for the Extractor

use thiserror::Error;
use urlsift_domain::ValidationError;
use urlsift_llm::LlmError;
use urlsift_schema::SchemaError;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Missing instruction, unknown fallback or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// The LLM endpoint could not be reached
    #[error("API connection error: {0}")]
    ApiConnection(String),

    /// The LLM endpoint answered with a non-2xx status
    #[error("API response error (HTTP {status}): {body}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The completion is not a JSON object
    #[error("Content parse error: {0}")]
    ContentParse(String),

    /// Required data is missing from the result
    #[error("Schema validation failed: {} critical error(s)", .errors.len())]
    SchemaValidation {
        /// The critical validation errors
        errors: Vec<ValidationError>,
    },

    /// The page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// No strategy is registered under the name
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

impl ExtractorError {
    /// Short label used as the metrics `error_type`
    pub fn error_type(&self) -> &'static str {
        match self {
            ExtractorError::Config(_) => "config",
            ExtractorError::ApiConnection(_) => "api_connection",
            ExtractorError::ApiResponse { .. } => "api_response",
            ExtractorError::ContentParse(_) => "content_parse",
            ExtractorError::SchemaValidation { .. } => "schema_validation",
            ExtractorError::Fetch(_) => "fetch",
            ExtractorError::UnknownStrategy(_) => "unknown_strategy",
        }
    }
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Connection(message) => ExtractorError::ApiConnection(message),
            LlmError::Response { status, body } => ExtractorError::ApiResponse { status, body },
            LlmError::InvalidResponse(message) => ExtractorError::ContentParse(message),
            LlmError::Config(message) => ExtractorError::Config(message),
        }
    }
}

impl From<SchemaError> for ExtractorError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::Validation { errors, .. } => ExtractorError::SchemaValidation { errors },
            SchemaError::InvalidSchema(message) => ExtractorError::Config(message),
        }
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::ContentParse(e.to_string())
    }
}
