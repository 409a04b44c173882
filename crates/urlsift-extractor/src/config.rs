//! Configuration for the extraction pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use urlsift_domain::TokenUsage;

/// Price of one model, in dollars per million tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Dollars per million prompt tokens
    #[serde(default)]
    pub prompt_per_million: f64,

    /// Dollars per million completion tokens
    #[serde(default)]
    pub completion_per_million: f64,
}

impl ModelPricing {
    /// Create a price entry
    pub fn new(prompt_per_million: f64, completion_per_million: f64) -> Self {
        Self {
            prompt_per_million,
            completion_per_million,
        }
    }

    /// Dollar cost of one call
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        (usage.prompt_tokens as f64 * self.prompt_per_million
            + usage.completion_tokens as f64 * self.completion_per_million)
            / 1_000_000.0
    }
}

/// Configuration for strategies and the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum page content sent to the LLM (characters)
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Strategy used when no strategy route matches a URL
    #[serde(default = "default_fallback_strategy")]
    pub fallback_strategy: String,

    /// Run schema validation on every result
    #[serde(default = "default_validate_results")]
    pub validate_results: bool,

    /// Per-model prices used to estimate the cost of each call
    ///
    /// Models without an entry are not costed.
    #[serde(default)]
    pub pricing: BTreeMap<String, ModelPricing>,
}

fn default_max_content_chars() -> usize {
    50_000
}

fn default_fallback_strategy() -> String {
    "general".to_string()
}

fn default_validate_results() -> bool {
    true
}

impl Default for PipelineConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            fallback_strategy: default_fallback_strategy(),
            validate_results: default_validate_results(),
            pricing: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Aggressive preset: small prompts for cheap, fast calls
    pub fn aggressive() -> Self {
        Self {
            max_content_chars: 20_000,
            ..Self::default()
        }
    }

    /// Lenient preset: large prompts for long pages
    pub fn lenient() -> Self {
        Self {
            max_content_chars: 100_000,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.fallback_strategy.trim().is_empty() {
            return Err("fallback_strategy cannot be empty".to_string());
        }
        for (model, price) in &self.pricing {
            let rates = [price.prompt_per_million, price.completion_per_million];
            if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
                return Err(format!("pricing for '{}' must be finite and non-negative", model));
            }
        }
        Ok(())
    }

    /// Set the price of a model
    pub fn with_pricing(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.pricing.insert(model.into(), pricing);
        self
    }

    /// Estimated dollar cost of a call, if the model has a price
    pub fn estimate_cost(&self, model: &str, usage: &TokenUsage) -> Option<f64> {
        self.pricing.get(model).map(|price| price.cost(usage))
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
