//! Schema validation errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker phrase of a missing-required-property message
pub const REQUIRED_PROPERTY_MARKER: &str = "is a required property";

/// One schema violation found in an extraction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending value (dotted, empty for the root)
    pub path: String,

    /// Human-readable description
    pub message: String,

    /// Location of the violated keyword inside the schema
    pub schema_path: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        schema_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            schema_path: schema_path.into(),
        }
    }

    /// A required property is missing and no default covered it
    pub fn missing_required(path: &str, property: &str, schema_path: &str) -> Self {
        Self::new(
            path,
            format!("'{}' {}", property, REQUIRED_PROPERTY_MARKER),
            schema_path,
        )
    }

    /// The schema keyword that was violated (last `schema_path` segment)
    pub fn keyword(&self) -> &str {
        self.schema_path
            .rsplit('.')
            .next()
            .unwrap_or(self.schema_path.as_str())
    }

    /// Critical errors are unrecoverable: a required property is missing
    ///
    /// Defaults are applied before validation, so any remaining
    /// missing-required report could not be defaulted. Messages may quote
    /// extracted values, so only the keyword is consulted.
    pub fn is_critical(&self) -> bool {
        self.keyword() == "required"
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_is_critical() {
        let error = ValidationError::missing_required("", "title", "required");
        assert!(error.is_critical());
        assert!(error.message.contains("required property"));
        assert_eq!(error.to_string(), "'title' is a required property");
    }

    #[test]
    fn test_type_mismatch_is_not_critical() {
        let error =
            ValidationError::new("tags", "\"x\" is not of type 'array'", "properties.tags.type");
        assert!(!error.is_critical());
        assert_eq!(error.to_string(), "tags: \"x\" is not of type 'array'");
    }

    #[test]
    fn test_quoted_required_phrase_in_value_is_not_critical() {
        let error = ValidationError::new(
            "tags",
            "\"note: 'x' is a required property\" is not of type 'array'",
            "properties.tags.type",
        );
        assert_eq!(error.keyword(), "type");
        assert!(!error.is_critical());
    }

    #[test]
    fn test_nested_required_is_critical() {
        let error =
            ValidationError::missing_required("author", "name", "properties.author.required");
        assert_eq!(error.keyword(), "required");
        assert!(error.is_critical());
    }
}
