//! Schema error types

use thiserror::Error;
use urlsift_domain::ValidationError;

/// Errors that can occur during schema operations
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Required data is missing and no default could supply it
    #[error("Schema validation failed for '{content_type}': {}", summarize(.errors))]
    Validation {
        /// Content type the result was validated as
        content_type: String,
        /// The critical errors
        errors: Vec<ValidationError>,
    },

    /// A schema document is not a JSON object
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

impl SchemaError {
    /// Validation errors carried by the error, if any
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SchemaError::Validation { errors, .. } => errors,
            SchemaError::InvalidSchema(_) => &[],
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
