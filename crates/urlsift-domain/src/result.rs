//! Extraction results and their metadata block

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the metadata object inside every extraction result
pub const METADATA_KEY: &str = "_metadata";

/// Token accounting reported by the LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u64,

    /// Sum of both
    #[serde(default)]
    pub total_tokens: u64,
}

/// Structured data extracted from one page
///
/// A JSON object whose fields are defined by the resolved schema, plus an
/// `_metadata` object (model, timestamp, usage, performance, content type,
/// validation errors). The strategy creates it, the validator fills defaults
/// in place, metrics only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: Map<String, Value>,
}

impl ExtractionResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; returns `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Mutably borrow the underlying object
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Whether the field exists (even if null)
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The metadata object, if present and well-formed
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.fields.get(METADATA_KEY).and_then(Value::as_object)
    }

    /// Run `f` on the metadata object, created (or replaced if not an
    /// object) on demand
    pub fn with_metadata<R>(&mut self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let entry = self
            .fields
            .entry(METADATA_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = entry {
            return f(map);
        }
        let mut map = Map::new();
        let out = f(&mut map);
        *entry = Value::Object(map);
        out
    }

    /// Set a metadata key unless the result already carries it
    ///
    /// Returns `true` when the value was written.
    pub fn set_metadata_if_absent(&mut self, key: &str, value: impl Into<Value>) -> bool {
        self.with_metadata(|metadata| {
            if metadata.contains_key(key) {
                return false;
            }
            metadata.insert(key.to_string(), value.into());
            true
        })
    }

    /// Set a metadata key, overwriting any previous value
    pub fn set_metadata(&mut self, key: &str, value: impl Into<Value>) {
        self.with_metadata(|metadata| metadata.insert(key.to_string(), value.into()));
    }

    /// Token usage recorded in the metadata, if any
    pub fn usage(&self) -> Option<TokenUsage> {
        self.metadata()
            .and_then(|m| m.get("usage"))
            .and_then(|u| serde_json::from_value(u.clone()).ok())
    }

    /// Model name recorded in the metadata, if any
    pub fn model(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get("model"))
            .and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for ExtractionResult {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
