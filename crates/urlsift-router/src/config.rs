//! Routing file format.
//!
//! The routing table persists as a JSON document:
//!
//! ```json
//! {
//!   "mappings": [
//!     {
//!       "url_pattern": "coindesk.com",
//!       "pattern_type": "domain",
//!       "priority": 10,
//!       "matcher_options": {"include_subdomains": true},
//!       "extractors": [{"extractor_id": "crypto_news", "target_group": "news", "params": {}}]
//!     }
//!   ]
//! }
//! ```

use crate::matcher::{MatcherOptions, PatternType};
use crate::RouterError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use urlsift_domain::ExtractorConfig;

/// One persisted routing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSpec {
    /// Pattern text, interpreted according to `pattern_type`
    pub url_pattern: String,

    /// Matching semantics
    pub pattern_type: PatternType,

    /// Higher priorities are evaluated first
    #[serde(default)]
    pub priority: i32,

    /// Matcher switches
    #[serde(default)]
    pub matcher_options: MatcherOptions,

    /// Extractors contributed when the rule matches
    #[serde(default)]
    pub extractors: Vec<ExtractorConfig>,
}

/// The persisted routing table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Routing rules, in any order
    #[serde(default)]
    pub mappings: Vec<MappingSpec>,
}

impl RoutingConfig {
    /// Parse a routing document
    pub fn from_json(json: &str) -> Result<Self, RouterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty-printed routing document
    pub fn to_json(&self) -> Result<String, RouterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a routing document from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RouterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write the routing document to disk
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RouterError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
