//! Extraction result validation
//!
//! Supports the JSON-Schema subset used by the registry: `type` (a name or a
//! list of names), `properties`, `required`, `items`, `enum`, `minimum`,
//! `maximum` and per-property `default`.

use crate::{SchemaError, SchemaRegistry};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use urlsift_domain::{ExtractionResult, ValidationError};

/// Longest value preview quoted in an error message
const PREVIEW_CHARS: usize = 60;

/// Validates extraction results against registry schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    registry: SchemaRegistry,
}

impl SchemaValidator {
    /// Create a validator backed by `registry`
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The schema registry
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Mutable access to the schema registry
    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Validate a result, optionally filling schema defaults first
    ///
    /// An explicit `schema` wins over `content_type`; with neither, the
    /// general schema is used. Defaults are written into `result` before
    /// validation, so the report describes the filled result.
    pub fn validate(
        &self,
        result: &mut ExtractionResult,
        content_type: Option<&str>,
        schema: Option<&Value>,
        fill_defaults: bool,
    ) -> (bool, Vec<ValidationError>) {
        let resolved;
        let schema = match schema {
            Some(schema) => schema,
            None => {
                resolved = self.registry.get_schema(content_type.unwrap_or("general"));
                &resolved
            }
        };

        if fill_defaults {
            apply_defaults(result.as_map_mut(), schema);
        }

        let mut errors = Vec::new();
        let value = Value::Object(result.as_map().clone());
        check(&value, schema, "", "", &mut errors);

        (errors.is_empty(), errors)
    }

    /// Validate, fill defaults and annotate a result
    ///
    /// The content type is detected from `content` and `url` when not
    /// given. Missing required data fails with [`SchemaError::Validation`];
    /// any other violation is logged, recorded under
    /// `_metadata.validation_errors`, and the result is returned.
    pub fn validate_and_enhance(
        &self,
        mut result: ExtractionResult,
        content: &str,
        url: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<ExtractionResult, SchemaError> {
        let content_type = match content_type {
            Some(ct) => ct.to_string(),
            None => self
                .registry
                .generate_dynamic_schema(content, url)
                .as_str()
                .to_string(),
        };

        let (is_valid, errors) = self.validate(&mut result, Some(&content_type), None, true);
        debug!("Validated result as {} (valid: {})", content_type, is_valid);

        let (critical, recoverable): (Vec<_>, Vec<_>) =
            errors.into_iter().partition(ValidationError::is_critical);

        if !critical.is_empty() {
            warn!(
                "Critical validation errors for {}: {} missing required field(s)",
                content_type,
                critical.len()
            );
            return Err(SchemaError::Validation {
                content_type,
                errors: critical,
            });
        }

        for error in &recoverable {
            warn!("Non-critical validation error ({}): {}", content_type, error);
        }

        let recorded =
            serde_json::to_value(&recoverable).unwrap_or_else(|_| Value::Array(Vec::new()));
        result.set_metadata("validation_errors", recorded);
        result.set_metadata("content_type", content_type);
        Ok(result)
    }
}

/// Fill absent properties that carry a default, recursing into nested objects
fn apply_defaults(object: &mut Map<String, Value>, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    for (name, property) in properties {
        if !object.contains_key(name) {
            if let Some(default) = property.get("default") {
                object.insert(name.clone(), default.clone());
            }
        }
        if let Some(Value::Object(nested)) = object.get_mut(name) {
            apply_defaults(nested, property);
        }
    }
}

fn check(
    value: &Value,
    schema: &Value,
    path: &str,
    schema_path: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(expected) = schema.get("type") {
        if !matches_type(value, expected) {
            errors.push(ValidationError::new(
                path,
                format!("{} is not of type {}", preview(value), describe_type(expected)),
                join(schema_path, "type"),
            ));
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            errors.push(ValidationError::new(
                path,
                format!("{} is not one of {}", preview(value), Value::Array(allowed.clone())),
                join(schema_path, "enum"),
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(minimum) = schema.get("minimum").and_then(Value::as_f64) {
            if number < minimum {
                errors.push(ValidationError::new(
                    path,
                    format!("{} is less than the minimum of {}", value, minimum),
                    join(schema_path, "minimum"),
                ));
            }
        }
        if let Some(maximum) = schema.get("maximum").and_then(Value::as_f64) {
            if number > maximum {
                errors.push(ValidationError::new(
                    path,
                    format!("{} is greater than the maximum of {}", value, maximum),
                    join(schema_path, "maximum"),
                ));
            }
        }
    }

    match value {
        Value::Object(object) => {
            for name in schema
                .get("required")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
            {
                if !object.contains_key(name) {
                    errors.push(ValidationError::missing_required(
                        path,
                        name,
                        &join(schema_path, "required"),
                    ));
                }
            }

            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, property) in properties {
                    if let Some(child) = object.get(name) {
                        check(
                            child,
                            property,
                            &join(path, name),
                            &join(&join(schema_path, "properties"), name),
                            errors,
                        );
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items").filter(|s| s.is_object()) {
                let item_schema_path = join(schema_path, "items");
                for (index, item) in items.iter().enumerate() {
                    let item_path = join(path, &index.to_string());
                    check(item, item_schema, &item_path, &item_schema_path, errors);
                }
            }
        }
        _ => {}
    }
}

fn matches_type(value: &Value, expected: &Value) -> bool {
    match expected {
        Value::String(name) => matches_type_name(value, name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| matches_type_name(value, name)),
        _ => true,
    }
}

fn matches_type_name(value: &Value, name: &str) -> bool {
    match name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        // Unknown type names constrain nothing
        _ => true,
    }
}

fn describe_type(expected: &Value) -> String {
    match expected {
        Value::String(name) => format!("'{}'", name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .map(|name| format!("'{}'", name))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_CHARS {
        return text;
    }
    let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
