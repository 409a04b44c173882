//! Explicit catalog of extraction strategies

use crate::error::ExtractorError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use urlsift_domain::traits::ExtractionStrategy;
use urlsift_domain::ContentType;

/// A type-erased strategy
pub type DynStrategy = dyn ExtractionStrategy<Error = ExtractorError>;

/// Strategies by registration name
///
/// Built at startup and handed to the pipeline; routing rules refer to
/// strategies by `extractor_id`.
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<DynStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy under its name, returning the one it replaces
    pub fn register(&mut self, strategy: Arc<DynStrategy>) -> Option<Arc<DynStrategy>> {
        let name = strategy.name().to_string();
        info!("Registering strategy '{}' ({})", name, strategy.category());
        self.strategies.insert(name, strategy)
    }

    /// Look up a strategy by name
    pub fn get(&self, name: &str) -> Result<Arc<DynStrategy>, ExtractorError> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| ExtractorError::UnknownStrategy(name.to_string()))
    }

    /// Whether a strategy is registered under the name
    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of the strategies built for a category, sorted
    pub fn by_category(&self, category: ContentType) -> Vec<String> {
        let mut names: Vec<String> = self
            .strategies
            .iter()
            .filter(|(_, s)| s.category() == category)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Number of strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::LlmExtractionStrategy;
    use urlsift_llm::MockProvider;

    fn strategy(name: &str, category: ContentType) -> Arc<DynStrategy> {
        Arc::new(LlmExtractionStrategy::new(name, category, MockProvider::default()))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = StrategyRegistry::new();
        assert!(registry.register(strategy("coindesk", ContentType::Crypto)).is_none());
        assert!(registry.register(strategy("coindesk", ContentType::Crypto)).is_some());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("coindesk").unwrap().name(), "coindesk");
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = StrategyRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(ExtractorError::UnknownStrategy(ref name)) if name == "missing"
        ));
    }

    #[test]
    fn test_by_category() {
        let mut registry = StrategyRegistry::new();
        registry.register(strategy("coindesk", ContentType::Crypto));
        registry.register(strategy("decrypt", ContentType::Crypto));
        registry.register(strategy("reuters", ContentType::News));

        assert_eq!(registry.by_category(ContentType::Crypto), vec!["coindesk", "decrypt"]);
        assert_eq!(registry.by_category(ContentType::Forum), Vec::<String>::new());
        assert_eq!(registry.names(), vec!["coindesk", "decrypt", "reuters"]);
    }
}
