//! Schema registry: base schema plus per-content-type schemas

use crate::builtin::{base_schema, builtin_schema};
use crate::detect::detect_content_type;
use crate::SchemaError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{info, warn};
use urlsift_domain::ContentType;

const FALLBACK_CONTENT_TYPE: &str = "general";

/// Registry of merged extraction schemas keyed by content type name
///
/// Every stored schema is already merged with the base schema. Names are
/// free-form so callers can register content types beyond the built-in
/// ones.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    base: Value,
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    /// Create a registry holding the built-in schemas
    pub fn new() -> Self {
        let base = base_schema();
        let schemas = ContentType::ALL
            .iter()
            .map(|ct| (ct.as_str().to_string(), merge_schemas(&base, &builtin_schema(*ct))))
            .collect();
        Self { base, schemas }
    }

    /// The unmerged base schema
    pub fn base_schema(&self) -> &Value {
        &self.base
    }

    /// Merged schema for a content type
    ///
    /// Unknown names degrade to the general schema.
    pub fn get_schema(&self, content_type: &str) -> Value {
        if let Some(schema) = self.schemas.get(content_type) {
            return schema.clone();
        }

        warn!(
            "Unknown content type '{}', using {} schema",
            content_type, FALLBACK_CONTENT_TYPE
        );
        self.schemas
            .get(FALLBACK_CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| self.base.clone())
    }

    /// Merged schema for a built-in content type
    pub fn schema_for(&self, content_type: ContentType) -> Value {
        self.get_schema(content_type.as_str())
    }

    /// Merge `schema` with the base and store it under `content_type`
    ///
    /// Overwrites any previous entry, built-in or not.
    pub fn register_schema(
        &mut self,
        content_type: impl Into<String>,
        schema: &Value,
    ) -> Result<(), SchemaError> {
        let content_type = content_type.into();
        if !schema.is_object() {
            return Err(SchemaError::InvalidSchema(format!(
                "schema for '{}' must be a JSON object",
                content_type
            )));
        }

        let merged = merge_schemas(&self.base, schema);
        if self.schemas.insert(content_type.clone(), merged).is_some() {
            info!("Replaced schema for content type '{}'", content_type);
        } else {
            info!("Registered schema for new content type '{}'", content_type);
        }
        Ok(())
    }

    /// Whether a schema is registered under the name
    pub fn contains(&self, content_type: &str) -> bool {
        self.schemas.contains_key(content_type)
    }

    /// Registered content type names, sorted
    pub fn content_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }

    /// Guess the content type of a page
    pub fn generate_dynamic_schema(&self, content: &str, url: Option<&str>) -> ContentType {
        detect_content_type(content, url)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a content-type schema onto a base schema
///
/// `required` becomes the union of both lists, base entries first.
/// Properties of `specific` replace same-named base properties, and any
/// other top-level keyword of `specific` replaces the base one.
pub fn merge_schemas(base: &Value, specific: &Value) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    let Some(specific) = specific.as_object() else {
        return Value::Object(merged);
    };

    for (key, value) in specific {
        match key.as_str() {
            "properties" => {
                let mut properties = merged
                    .get("properties")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                if let Some(extra) = value.as_object() {
                    for (name, property) in extra {
                        properties.insert(name.clone(), property.clone());
                    }
                }
                merged.insert(key.clone(), Value::Object(properties));
            }
            "required" => {
                let mut required: Vec<Value> = merged
                    .get("required")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                for name in value.as_array().into_iter().flatten() {
                    if !required.contains(name) {
                        required.push(name.clone());
                    }
                }
                merged.insert(key.clone(), Value::Array(required));
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    merged
        .entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = SchemaRegistry::new();
        for ct in ContentType::ALL {
            assert!(registry.contains(ct.as_str()));
        }
        assert_eq!(registry.content_types().len(), ContentType::ALL.len());
    }

    #[test]
    fn test_crypto_schema_is_merged_with_base() {
        let registry = SchemaRegistry::new();
        let schema = registry.get_schema("crypto");

        assert_eq!(
            required(&schema),
            vec!["title", "content", "cryptocurrencies", "sentiment"]
        );
        assert!(schema["properties"]["summary"].is_object());
        assert!(schema["properties"]["price_data"].is_object());
    }

    #[test]
    fn test_aliases_resolve_to_shared_schema() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.get_schema("blog"), registry.get_schema("news"));
        assert_eq!(registry.get_schema("forum"), registry.get_schema("social_media"));
    }

    #[test]
    fn test_unknown_type_falls_back_to_general() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.get_schema("recipes"), registry.get_schema("general"));
    }

    #[test]
    fn test_register_overrides_alias_independently() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_schema(
                "blog",
                &json!({
                    "properties": {"reading_time": {"type": "integer", "default": 0}},
                    "required": ["reading_time"]
                }),
            )
            .unwrap();

        let blog = registry.get_schema("blog");
        assert_eq!(required(&blog), vec!["title", "reading_time"]);
        assert!(blog["properties"]["title"].is_object());
        assert_ne!(registry.get_schema("research"), blog);
    }

    #[test]
    fn test_register_new_content_type() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_schema("recipe", &json!({"properties": {"ingredients": {"type": "array"}}}))
            .unwrap();

        assert!(registry.contains("recipe"));
        let schema = registry.get_schema("recipe");
        assert!(schema["properties"]["ingredients"].is_object());
        assert_eq!(required(&schema), vec!["title"]);
    }

    #[test]
    fn test_register_rejects_non_objects() {
        let mut registry = SchemaRegistry::new();
        let result = registry.register_schema("broken", &json!(["not", "a", "schema"]));
        assert!(matches!(result, Err(SchemaError::InvalidSchema(_))));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_merge_overrides_properties_and_unions_required() {
        let base = json!({
            "type": "object",
            "properties": {"title": {"type": "string"}, "author": {"type": "string"}},
            "required": ["title"]
        });
        let specific = json!({
            "properties": {"author": {"type": ["string", "null"]}},
            "required": ["author", "title"]
        });

        let merged = merge_schemas(&base, &specific);
        assert_eq!(merged["properties"]["author"]["type"], json!(["string", "null"]));
        assert_eq!(merged["required"], json!(["title", "author"]));
        assert_eq!(merged["type"], "object");
    }

    #[test]
    fn test_dynamic_schema_detection() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry
                .generate_dynamic_schema("bitcoin hits new high", Some("https://reddit.com/r/x")),
            ContentType::Crypto
        );
    }
}
