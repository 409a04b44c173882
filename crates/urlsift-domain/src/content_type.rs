//! Content type module - categories driving schema selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a fetched page
///
/// Blog and research pages share the news schema by default, forums share the
/// social-media schema. Each can still be overridden independently in the
/// schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// News articles
    News,

    /// Social media posts
    SocialMedia,

    /// Blog posts
    Blog,

    /// Forum threads
    Forum,

    /// Research papers and studies
    Research,

    /// Cryptocurrency news and market commentary
    Crypto,

    /// Anything else
    General,
}

impl ContentType {
    /// Every content type, in declaration order
    pub const ALL: [ContentType; 7] = [
        ContentType::News,
        ContentType::SocialMedia,
        ContentType::Blog,
        ContentType::Forum,
        ContentType::Research,
        ContentType::Crypto,
        ContentType::General,
    ];

    /// Get the content type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::SocialMedia => "social_media",
            ContentType::Blog => "blog",
            ContentType::Forum => "forum",
            ContentType::Research => "research",
            ContentType::Crypto => "crypto",
            ContentType::General => "general",
        }
    }

    /// Parse a content type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "news" => Some(ContentType::News),
            "social_media" | "social" => Some(ContentType::SocialMedia),
            "blog" => Some(ContentType::Blog),
            "forum" => Some(ContentType::Forum),
            "research" => Some(ContentType::Research),
            "crypto" => Some(ContentType::Crypto),
            "general" => Some(ContentType::General),
            _ => None,
        }
    }

    /// The content type whose default schema this one borrows
    pub fn schema_alias(&self) -> ContentType {
        match self {
            ContentType::Blog | ContentType::Research => ContentType::News,
            ContentType::Forum => ContentType::SocialMedia,
            other => *other,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid content type: {}", s))
    }
}
