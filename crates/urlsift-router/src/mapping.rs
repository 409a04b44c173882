//! Routing rules pairing a compiled matcher with extractor references.

use crate::config::MappingSpec;
use crate::matcher::{MatcherOptions, PatternType, UrlMatcher};
use crate::RouterError;
use urlsift_domain::ExtractorConfig;

/// A routing rule: pattern + priority + extractor list
///
/// Built at configuration time and read-only afterwards. Equality compares
/// the rule definition, never the compiled matcher.
#[derive(Debug, Clone)]
pub struct UrlExtractorMapping {
    pattern: String,
    pattern_type: PatternType,
    options: MatcherOptions,
    extractors: Vec<ExtractorConfig>,
    priority: i32,
    matcher: UrlMatcher,
}

impl UrlExtractorMapping {
    /// Create a rule with default matcher options
    pub fn new(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        extractors: Vec<ExtractorConfig>,
        priority: i32,
    ) -> Result<Self, RouterError> {
        Self::with_options(pattern, pattern_type, MatcherOptions::default(), extractors, priority)
    }

    /// Create a rule with explicit matcher options
    pub fn with_options(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        options: MatcherOptions,
        extractors: Vec<ExtractorConfig>,
        priority: i32,
    ) -> Result<Self, RouterError> {
        let pattern = pattern.into();
        let matcher = UrlMatcher::compile(&pattern, pattern_type, &options)?;
        Ok(Self {
            pattern,
            pattern_type,
            options,
            extractors,
            priority,
            matcher,
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

    /// Matcher switches
    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Extractors contributed on match
    pub fn extractors(&self) -> &[ExtractorConfig] {
        &self.extractors
    }

    /// Evaluation priority (higher first)
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the URL falls under this rule
    pub fn matches(&self, url: &str) -> bool {
        self.matcher.matches(url)
    }

    /// Persisted form of the rule
    pub fn to_spec(&self) -> MappingSpec {
        MappingSpec {
            url_pattern: self.pattern.clone(),
            pattern_type: self.pattern_type,
            priority: self.priority,
            matcher_options: self.options,
            extractors: self.extractors.clone(),
        }
    }
}

impl PartialEq for UrlExtractorMapping {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.pattern_type == other.pattern_type
            && self.options == other.options
            && self.priority == other.priority
            && self.extractors == other.extractors
    }
}

impl TryFrom<MappingSpec> for UrlExtractorMapping {
    type Error = RouterError;

    fn try_from(spec: MappingSpec) -> Result<Self, Self::Error> {
        Self::with_options(
            spec.url_pattern,
            spec.pattern_type,
            spec.matcher_options,
            spec.extractors,
            spec.priority,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_compiled_matcher() {
        let a = UrlExtractorMapping::new(
            "^https://a\\.com",
            PatternType::Regex,
            vec![ExtractorConfig::new("x", "g")],
            1,
        )
        .unwrap();
        let b = a.clone();
        assert_eq!(a, b);

        let c = UrlExtractorMapping::new(
            "^https://a\\.com",
            PatternType::Regex,
            vec![ExtractorConfig::new("x", "g")],
            2,
        )
        .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_spec_round_trip() {
        let mapping = UrlExtractorMapping::with_options(
            "example.com",
            PatternType::Domain,
            MatcherOptions::subdomains(),
            vec![ExtractorConfig::new("news", "article")],
            7,
        )
        .unwrap();

        let restored = UrlExtractorMapping::try_from(mapping.to_spec()).unwrap();
        assert_eq!(restored, mapping);
        assert!(restored.matches("https://blog.example.com"));
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let spec = MappingSpec {
            url_pattern: "(".to_string(),
            pattern_type: PatternType::Regex,
            priority: 0,
            matcher_options: MatcherOptions::default(),
            extractors: vec![],
        };
        assert!(UrlExtractorMapping::try_from(spec).is_err());
    }
}
