//! URL pattern matchers.
//!
//! Matchers are pure predicates. They never fail at match time: a URL that
//! cannot be parsed simply does not match. Regexes are compiled once, when
//! the matcher is built.

use crate::RouterError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a rule's pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Host comparison, optionally extended to subdomains
    Domain,
    /// Substring of the full URL
    Path,
    /// Full-string equality, no normalization
    Exact,
    /// Regular expression searched in the full URL
    Regex,
}

impl PatternType {
    /// Get the pattern type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Domain => "domain",
            PatternType::Path => "path",
            PatternType::Exact => "exact",
            PatternType::Regex => "regex",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-rule matcher switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherOptions {
    /// Domain rules also match `*.pattern`
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_subdomains: bool,

    /// Regex rules compile case-sensitively
    #[serde(default, skip_serializing_if = "is_false")]
    pub case_sensitive: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MatcherOptions {
    /// Options with subdomain matching enabled
    pub fn subdomains() -> Self {
        Self {
            include_subdomains: true,
            ..Self::default()
        }
    }

    /// Options with case-sensitive regex matching
    pub fn case_sensitive() -> Self {
        Self {
            case_sensitive: true,
            ..Self::default()
        }
    }
}

/// A compiled URL predicate
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    /// Host equals `domain` (or ends with `.domain` when subdomains are included)
    Domain {
        /// Normalized domain (lowercase, no `www.`)
        domain: String,
        /// Whether subdomains match too
        include_subdomains: bool,
    },
    /// URL contains the substring
    Path(String),
    /// URL equals the string exactly
    Exact(String),
    /// URL contains a match of the regex
    Regex(Regex),
}

impl UrlMatcher {
    /// Compile a pattern into a matcher
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for an empty pattern or a
    /// regex that does not compile.
    pub fn compile(
        pattern: &str,
        pattern_type: PatternType,
        options: &MatcherOptions,
    ) -> Result<Self, RouterError> {
        if pattern.trim().is_empty() {
            return Err(RouterError::invalid_pattern(pattern, "pattern is empty"));
        }

        let matcher = match pattern_type {
            PatternType::Domain => UrlMatcher::Domain {
                domain: normalize_host(pattern.trim()),
                include_subdomains: options.include_subdomains,
            },
            PatternType::Path => UrlMatcher::Path(pattern.to_string()),
            PatternType::Exact => UrlMatcher::Exact(pattern.to_string()),
            PatternType::Regex => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(!options.case_sensitive)
                    .build()
                    .map_err(|e| RouterError::invalid_pattern(pattern, e))?;
                UrlMatcher::Regex(regex)
            }
        };
        Ok(matcher)
    }

    /// Whether the URL belongs to this matcher
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlMatcher::Domain {
                domain,
                include_subdomains,
            } => match extract_host(url) {
                Some(host) => {
                    host == *domain
                        || (*include_subdomains && host.ends_with(&format!(".{}", domain)))
                }
                None => false,
            },
            UrlMatcher::Path(fragment) => url.contains(fragment.as_str()),
            UrlMatcher::Exact(expected) => url == expected,
            UrlMatcher::Regex(regex) => regex.is_match(url),
        }
    }
}

/// Extract the host of an absolute URL, lowercased and without `www.`
///
/// # Examples
/// ```
/// use urlsift_router::matcher::extract_host;
///
/// assert_eq!(extract_host("https://www.Example.com:8080/x"), Some("example.com".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(normalize_host(host))
}

fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
