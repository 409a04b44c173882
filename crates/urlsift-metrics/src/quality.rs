//! Heuristic quality score for extraction results
//!
//! score = 0.5 * required present
//!       + 0.3 * optional present
//!       - 0.3 * required present but empty
//!       + 0.2 * metadata keys present
//!
//! each term a fraction of its field list, clamped to [0, 1].

use serde_json::Value;
use urlsift_domain::{ContentType, ExtractionResult};

const REQUIRED_WEIGHT: f64 = 0.5;
const OPTIONAL_WEIGHT: f64 = 0.3;
const EMPTY_PENALTY: f64 = 0.3;
const METADATA_WEIGHT: f64 = 0.2;

/// Metadata keys a complete result carries
pub const METADATA_FIELDS: &[&str] = &["model", "timestamp", "usage", "performance"];

const NEWS_REQUIRED: &[&str] = &["title", "content"];
const NEWS_OPTIONAL: &[&str] = &["summary", "author", "published_date", "category", "tags"];

const SOCIAL_REQUIRED: &[&str] = &["platform", "post_content"];
const SOCIAL_OPTIONAL: &[&str] = &[
    "author",
    "engagement",
    "hashtags",
    "mentions",
    "published_date",
];

const CRYPTO_REQUIRED: &[&str] = &["title", "content", "cryptocurrencies", "sentiment"];
const CRYPTO_OPTIONAL: &[&str] = &[
    "summary",
    "price_data",
    "market_impact",
    "key_events",
    "regulatory_mentions",
];

const GENERAL_REQUIRED: &[&str] = &["title"];
const GENERAL_OPTIONAL: &[&str] = &["summary", "content", "key_points"];

/// Required and optional field lists scored for a content type
///
/// Unknown names are scored as general content.
pub fn quality_fields(content_type: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match ContentType::parse(content_type).map(|ct| ct.schema_alias()) {
        Some(ContentType::News) => (NEWS_REQUIRED, NEWS_OPTIONAL),
        Some(ContentType::SocialMedia) => (SOCIAL_REQUIRED, SOCIAL_OPTIONAL),
        Some(ContentType::Crypto) => (CRYPTO_REQUIRED, CRYPTO_OPTIONAL),
        _ => (GENERAL_REQUIRED, GENERAL_OPTIONAL),
    }
}

/// Score an extraction result in [0, 1]
///
/// A field counts as present when its key exists, and as empty when it is
/// present but null, `""`, `[]` or `{}`.
pub fn calculate_extraction_quality(extraction: &ExtractionResult, content_type: &str) -> f64 {
    let (required, optional) = quality_fields(content_type);

    let present_required = count(required, |f| extraction.contains_key(f));
    let empty_required = count(required, |f| extraction.get(f).is_some_and(is_empty));
    let present_optional = count(optional, |f| extraction.contains_key(f));
    let present_metadata = match extraction.metadata() {
        Some(metadata) => count(METADATA_FIELDS, |f| metadata.contains_key(f)),
        None => 0,
    };

    let score = REQUIRED_WEIGHT * fraction(present_required, required.len())
        + OPTIONAL_WEIGHT * fraction(present_optional, optional.len())
        - EMPTY_PENALTY * fraction(empty_required, required.len())
        + METADATA_WEIGHT * fraction(present_metadata, METADATA_FIELDS.len());

    score.clamp(0.0, 1.0)
}

fn count(fields: &[&str], predicate: impl Fn(&str) -> bool) -> usize {
    fields.iter().filter(|f| predicate(f)).count()
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
