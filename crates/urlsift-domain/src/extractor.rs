//! Extractor references carried by routing rules

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies one extractor and the target group its output populates
///
/// Several extractors can share one URL and write into different target
/// groups (e.g. "news" and "price") of the same logical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Identifier of the extractor in the strategy catalog
    pub extractor_id: String,

    /// Semantic slot the extractor's output is assigned to
    pub target_group: String,

    /// Free-form extractor parameters
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ExtractorConfig {
    /// Create an extractor reference with no parameters
    pub fn new(extractor_id: impl Into<String>, target_group: impl Into<String>) -> Self {
        Self {
            extractor_id: extractor_id.into(),
            target_group: target_group.into(),
            params: Map::new(),
        }
    }

    /// Attach a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
