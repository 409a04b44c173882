//! Built-in schemas

use serde_json::{json, Value};
use urlsift_domain::ContentType;

/// Schema shared by every content type
pub fn base_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Title or headline of the page"
            },
            "summary": {
                "type": "string",
                "description": "Short summary of the content",
                "default": ""
            },
            "published_date": {
                "type": ["string", "null"],
                "description": "Publication date, ISO 8601 if known",
                "default": null
            },
            "language": {
                "type": "string",
                "description": "ISO 639-1 language code",
                "default": "en"
            },
            "_metadata": {
                "type": "object",
                "description": "Extraction metadata",
                "default": {}
            }
        },
        "required": ["title"]
    })
}

/// Unmerged built-in schema for a content type
///
/// Blog and research use the news schema, forums the social-media one.
pub fn builtin_schema(content_type: ContentType) -> Value {
    match content_type.schema_alias() {
        ContentType::News => news_schema(),
        ContentType::SocialMedia => social_media_schema(),
        ContentType::Crypto => crypto_schema(),
        _ => general_schema(),
    }
}

fn news_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "description": "Main article text"
            },
            "author": {
                "type": ["string", "null"],
                "default": null
            },
            "category": {
                "type": "string",
                "default": "general"
            },
            "tags": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            },
            "key_points": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            }
        },
        "required": ["content"]
    })
}

fn social_media_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "platform": {
                "type": "string",
                "description": "Platform the post was published on"
            },
            "author": {
                "type": "string",
                "description": "Handle or display name of the poster"
            },
            "post_content": {
                "type": "string",
                "description": "Text of the post"
            },
            "engagement": {
                "type": "object",
                "properties": {
                    "likes": {"type": "integer", "minimum": 0, "default": 0},
                    "shares": {"type": "integer", "minimum": 0, "default": 0},
                    "comments": {"type": "integer", "minimum": 0, "default": 0}
                },
                "default": {"likes": 0, "shares": 0, "comments": 0}
            },
            "hashtags": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            },
            "mentions": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            }
        },
        "required": ["platform", "post_content"]
    })
}

fn crypto_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "description": "Main article text"
            },
            "cryptocurrencies": {
                "type": "array",
                "description": "Assets discussed in the article",
                "items": {
                    "type": "object",
                    "properties": {
                        "symbol": {"type": "string"},
                        "name": {"type": "string"}
                    },
                    "required": ["symbol"]
                }
            },
            "sentiment": {
                "type": "string",
                "enum": ["bullish", "bearish", "neutral"],
                "default": "neutral"
            },
            "price_data": {
                "type": "object",
                "default": {}
            },
            "market_impact": {
                "type": "string",
                "default": "unknown"
            },
            "key_events": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            },
            "regulatory_mentions": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            }
        },
        "required": ["content", "cryptocurrencies", "sentiment"]
    })
}

fn general_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content": {
                "type": "string",
                "default": ""
            },
            "key_points": {
                "type": "array",
                "items": {"type": "string"},
                "default": []
            }
        },
        "required": []
    })
}
