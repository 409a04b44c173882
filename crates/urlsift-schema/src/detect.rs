//! Heuristic content-type detection
//!
//! Content signals always outrank URL signals, and crypto outranks social
//! media. Pages with no signal at all are treated as news.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use urlsift_domain::ContentType;

static CRYPTO_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:bitcoin|btc|ethereum|crypto(?:currency|currencies)?|blockchain|defi|nfts?|altcoins?|stablecoins?|solana|dogecoin|binance|coinbase|web3)\b",
    )
    .expect("Invalid crypto keyword pattern")
});

static SOCIAL_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:retweet(?:s|ed)?|tweet(?:s|ed)?|followers|reposted|shared a (?:post|photo|video|link)|liked by|posted on (?:twitter|x|facebook|instagram|reddit|linkedin))\b",
    )
    .expect("Invalid social phrase pattern")
});

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)#[A-Za-z][A-Za-z0-9_]*").expect("Invalid hashtag pattern")
});

/// Hashtags needed before content reads as a social post
const HASHTAG_THRESHOLD: usize = 2;

const SOCIAL_DOMAINS: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "reddit.com",
    "linkedin.com",
    "tiktok.com",
    "threads.net",
];

const BLOG_MARKERS: &[&str] = &["blog", "medium", "substack"];
const FORUM_MARKERS: &[&str] = &["forum", "community", "discuss"];
const RESEARCH_MARKERS: &[&str] = &["research", "paper", "study"];

/// Classify a page by its content and, failing that, its URL
///
/// # Examples
/// ```
/// use urlsift_domain::ContentType;
/// use urlsift_schema::detect_content_type;
///
/// let url = Some("https://twitter.com/a/status/1");
/// let ct = detect_content_type("Bitcoin rallied past 70k", url);
/// assert_eq!(ct, ContentType::Crypto);
/// ```
pub fn detect_content_type(content: &str, url: Option<&str>) -> ContentType {
    let detected = if CRYPTO_KEYWORDS.is_match(content) {
        ContentType::Crypto
    } else if is_social_content(content) {
        ContentType::SocialMedia
    } else {
        url.and_then(classify_url).unwrap_or(ContentType::News)
    };

    debug!("Detected content type {} (url: {:?})", detected, url);
    detected
}

fn is_social_content(content: &str) -> bool {
    SOCIAL_PHRASES.is_match(content) || HASHTAG.find_iter(content).count() >= HASHTAG_THRESHOLD
}

fn classify_url(url: &str) -> Option<ContentType> {
    let lowered = url.to_lowercase();

    if is_social_url(&lowered) {
        return Some(ContentType::SocialMedia);
    }

    let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));
    if contains_any(BLOG_MARKERS) {
        Some(ContentType::Blog)
    } else if contains_any(FORUM_MARKERS) {
        Some(ContentType::Forum)
    } else if contains_any(RESEARCH_MARKERS) {
        Some(ContentType::Research)
    } else {
        None
    }
}

fn is_social_url(url: &str) -> bool {
    let host = match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => return false,
        },
        // Scheme-less input: fall back to a substring test
        Err(_) => return SOCIAL_DOMAINS.iter().any(|d| url.contains(d)),
    };

    host.contains("mastodon")
        || SOCIAL_DOMAINS
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_content_outranks_social_url() {
        let ct = detect_content_type(
            "Everyone is talking about bitcoin today",
            Some("https://twitter.com/someone/status/1"),
        );
        assert_eq!(ct, ContentType::Crypto);
    }

    #[test]
    fn test_crypto_outranks_social_content() {
        let ct = detect_content_type("Retweet if you hold Ethereum #eth #moon", None);
        assert_eq!(ct, ContentType::Crypto);
    }

    #[test]
    fn test_crypto_keywords_need_word_boundaries() {
        assert_ne!(detect_content_type("A cryptic message", None), ContentType::Crypto);
        assert_eq!(detect_content_type("DeFi lending grows", None), ContentType::Crypto);
    }

    #[test]
    fn test_social_content() {
        assert_eq!(
            detect_content_type("She has 10k followers now", None),
            ContentType::SocialMedia
        );
        assert_eq!(
            detect_content_type("Great day at the beach #summer #sun", None),
            ContentType::SocialMedia
        );
        assert_eq!(
            detect_content_type("# Heading\n\nOne #tag only", None),
            ContentType::News
        );
    }

    #[test]
    fn test_content_outranks_url() {
        let ct = detect_content_type("Loved it #travel #food", Some("https://myblog.com/post"));
        assert_eq!(ct, ContentType::SocialMedia);
    }

    #[test]
    fn test_url_heuristics() {
        let plain = "The council approved the new budget.";
        let cases = [
            ("https://www.reddit.com/r/rust/comments/1", ContentType::SocialMedia),
            ("https://x.com/user/status/1", ContentType::SocialMedia),
            ("https://mastodon.social/@user/1", ContentType::SocialMedia),
            ("https://medium.com/@writer/story", ContentType::Blog),
            ("https://someone.substack.com/p/post", ContentType::Blog),
            ("https://community.example.com/t/123", ContentType::Forum),
            ("https://example.org/research/2024/findings", ContentType::Research),
            ("https://news.example.com/politics", ContentType::News),
        ];
        for (url, expected) in cases {
            assert_eq!(detect_content_type(plain, Some(url)), expected, "{}", url);
        }
    }

    #[test]
    fn test_lookalike_domains_are_not_social() {
        assert_eq!(
            detect_content_type("Quarterly results", Some("https://dropbox.com/files")),
            ContentType::News
        );
    }

    #[test]
    fn test_default_is_news() {
        assert_eq!(detect_content_type("", None), ContentType::News);
    }
}
