//! urlsift Router
//!
//! Maps page URLs to extractors and extraction strategies.
//!
//! Two resolution modes coexist and are deliberately separate operations:
//!
//! - [`UrlMappingManager::resolve_all_extractors`]: every matching rule
//!   contributes its extractors (multi-extractor fan-out).
//! - [`StrategyRouter::resolve_single_strategy`]: the first matching rule in
//!   priority order wins, otherwise the fallback strategy is used.
//!
//! # Example
//!
//! ```
//! use urlsift_domain::ExtractorConfig;
//! use urlsift_router::{PatternType, UrlExtractorMapping, UrlMappingManager};
//!
//! let mut manager = UrlMappingManager::new();
//! manager.add_mapping(UrlExtractorMapping::new(
//!     "coindesk.com",
//!     PatternType::Domain,
//!     vec![ExtractorConfig::new("crypto_news", "news")],
//!     10,
//! )?);
//! manager.add_mapping(UrlExtractorMapping::new(
//!     "/price/",
//!     PatternType::Path,
//!     vec![ExtractorConfig::new("price_extractor", "price")],
//!     5,
//! )?);
//!
//! let ids: Vec<_> = manager
//!     .resolve_all_extractors("https://coindesk.com/price/btc")
//!     .into_iter()
//!     .map(|e| e.extractor_id)
//!     .collect();
//! assert_eq!(ids, vec!["crypto_news", "price_extractor"]);
//! # Ok::<(), urlsift_router::RouterError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod manager;
pub mod mapping;
pub mod matcher;
pub mod strategy;

use thiserror::Error;

pub use config::{MappingSpec, RoutingConfig};
pub use manager::UrlMappingManager;
pub use mapping::UrlExtractorMapping;
pub use matcher::{MatcherOptions, PatternType, UrlMatcher};
pub use strategy::{StrategyMapping, StrategyRouter};

/// Router error
#[derive(Debug, Error)]
pub enum RouterError {
    /// Pattern cannot be compiled into a matcher
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        message: String,
    },

    /// Failed to read or write the routing file
    #[error("Routing config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Routing file is not valid JSON of the expected shape
    #[error("Routing config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        }
    }
}
