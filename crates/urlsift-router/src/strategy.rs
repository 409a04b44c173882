//! Single-winner routing: one strategy per URL, with a fallback.

use crate::matcher::{MatcherOptions, PatternType, UrlMatcher};
use crate::RouterError;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A routing rule that selects exactly one strategy
pub struct StrategyMapping<S: ?Sized> {
    pattern: String,
    pattern_type: PatternType,
    priority: i32,
    matcher: UrlMatcher,
    strategy: Arc<S>,
}

impl<S: ?Sized> StrategyMapping<S> {
    /// Compile a rule routing matching URLs to `strategy`
    pub fn new(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        options: MatcherOptions,
        strategy: Arc<S>,
        priority: i32,
    ) -> Result<Self, RouterError> {
        let pattern = pattern.into();
        let matcher = UrlMatcher::compile(&pattern, pattern_type, &options)?;
        Ok(Self {
            pattern,
            pattern_type,
            priority,
            matcher,
            strategy,
        })
    }

    /// Pattern text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Matching semantics
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Evaluation priority (higher first)
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The strategy selected on match
    pub fn strategy(&self) -> &Arc<S> {
        &self.strategy
    }

    /// Whether the URL falls under this rule
    pub fn matches(&self, url: &str) -> bool {
        self.matcher.matches(url)
    }

    /// Same pattern, type and priority, routing to the same strategy instance
    pub fn same_rule(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.pattern_type == other.pattern_type
            && self.priority == other.priority
            && Arc::ptr_eq(&self.strategy, &other.strategy)
    }
}

// Manual impls: a derive would require `S: Clone`/`S: Debug`
impl<S: ?Sized> Clone for StrategyMapping<S> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            pattern_type: self.pattern_type,
            priority: self.priority,
            matcher: self.matcher.clone(),
            strategy: Arc::clone(&self.strategy),
        }
    }
}

impl<S: ?Sized> fmt::Debug for StrategyMapping<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyMapping")
            .field("pattern", &self.pattern)
            .field("pattern_type", &self.pattern_type)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Routes each URL to exactly one strategy
///
/// Mappings are evaluated in priority order and the first match wins. URLs
/// matching nothing get the fallback.
pub struct StrategyRouter<S: ?Sized> {
    mappings: Vec<StrategyMapping<S>>,
    fallback: Arc<S>,
}

impl<S: ?Sized> StrategyRouter<S> {
    /// Create a router with no rules
    pub fn new(fallback: Arc<S>) -> Self {
        Self {
            mappings: Vec::new(),
            fallback,
        }
    }

    /// Insert a rule and restore priority order (stable for ties)
    pub fn add_mapping(&mut self, mapping: StrategyMapping<S>) {
        debug!(
            "Adding strategy route {} '{}' (priority {})",
            mapping.pattern_type(),
            mapping.pattern(),
            mapping.priority()
        );
        self.mappings.push(mapping);
        self.mappings.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Remove the first rule equal to `mapping` (see [`StrategyMapping::same_rule`])
    ///
    /// Returns `false` (and changes nothing) if no such rule exists.
    pub fn remove_mapping(&mut self, mapping: &StrategyMapping<S>) -> bool {
        match self.mappings.iter().position(|m| m.same_rule(mapping)) {
            Some(index) => {
                let removed = self.mappings.remove(index);
                debug!("Removed strategy route '{}'", removed.pattern());
                true
            }
            None => false,
        }
    }

    /// Strategy for `url`: the first matching rule, else the fallback
    pub fn resolve_single_strategy(&self, url: &str) -> Arc<S> {
        match self.mappings.iter().find(|m| m.matches(url)) {
            Some(mapping) => {
                debug!("Strategy route '{}' selected for {}", mapping.pattern(), url);
                Arc::clone(mapping.strategy())
            }
            None => {
                debug!("No strategy route for {}, using fallback", url);
                Arc::clone(&self.fallback)
            }
        }
    }

    /// The fallback strategy
    pub fn fallback(&self) -> &Arc<S> {
        &self.fallback
    }

    /// The rules, highest priority first
    pub fn mappings(&self) -> &[StrategyMapping<S>] {
        &self.mappings
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether there are no rules
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl<S: ?Sized> fmt::Debug for StrategyRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRouter")
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn named(name: &'static str) -> Arc<dyn Named> {
        Arc::new(Fixed(name))
    }

    fn route(
        pattern: &str,
        pattern_type: PatternType,
        name: &'static str,
        priority: i32,
    ) -> StrategyMapping<dyn Named> {
        let options = MatcherOptions::default();
        StrategyMapping::new(pattern, pattern_type, options, named(name), priority).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let mut router = StrategyRouter::new(named("general"));
        router.add_mapping(route("/price/", PatternType::Path, "price", 5));
        router.add_mapping(route("coindesk.com", PatternType::Domain, "crypto", 10));

        let strategy = router.resolve_single_strategy("https://coindesk.com/price/btc");
        assert_eq!(strategy.name(), "crypto");

        let strategy = router.resolve_single_strategy("https://other.com/price/btc");
        assert_eq!(strategy.name(), "price");
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let mut router = StrategyRouter::new(named("general"));
        router.add_mapping(route("coindesk.com", PatternType::Domain, "crypto", 10));

        assert_eq!(router.resolve_single_strategy("https://example.com").name(), "general");
        assert_eq!(router.resolve_single_strategy("not a url").name(), "general");
    }

    #[test]
    fn test_ties_resolve_to_earliest_insertion() {
        let mut router = StrategyRouter::new(named("general"));
        router.add_mapping(route("/a", PatternType::Path, "first", 1));
        router.add_mapping(route("/a", PatternType::Path, "second", 1));

        assert_eq!(router.resolve_single_strategy("https://x.com/a").name(), "first");
    }

    #[test]
    fn test_remove_mapping() {
        let mut router = StrategyRouter::new(named("general"));
        let crypto = route("coindesk.com", PatternType::Domain, "crypto", 10);
        router.add_mapping(crypto.clone());
        router.add_mapping(route("/price/", PatternType::Path, "price", 5));

        assert!(router.remove_mapping(&crypto));
        assert_eq!(router.len(), 1);
        let url = "https://coindesk.com/price/btc";
        assert_eq!(router.resolve_single_strategy(url).name(), "price");

        assert!(!router.remove_mapping(&crypto));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_remove_requires_same_strategy_instance() {
        let mut router = StrategyRouter::new(named("general"));
        router.add_mapping(route("coindesk.com", PatternType::Domain, "crypto", 10));

        // Same pattern, but a different strategy instance
        let lookalike = route("coindesk.com", PatternType::Domain, "crypto", 10);
        assert!(!router.remove_mapping(&lookalike));

        let registered = router.mappings()[0].clone();
        assert!(router.remove_mapping(&registered));
        assert!(router.is_empty());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = StrategyMapping::new(
            "[",
            PatternType::Regex,
            MatcherOptions::default(),
            named("x"),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_router() {
        let router: StrategyRouter<dyn Named> = StrategyRouter::new(named("general"));
        assert!(router.is_empty());
        assert_eq!(router.fallback().name(), "general");
    }
}
