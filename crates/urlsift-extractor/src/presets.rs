//! Content-specific strategy presets

use crate::registry::StrategyRegistry;
use crate::strategy::LlmExtractionStrategy;
use std::sync::Arc;
use urlsift_domain::ContentType;
use urlsift_llm::LlmProvider;
use urlsift_schema::SchemaRegistry;

const NEWS_INSTRUCTION: &str = "You extract structured data from news articles. \
Capture the headline as title, the full article body as content, a two or three \
sentence summary, the author if named, the publication date in ISO 8601, a topical \
category, descriptive tags and the key points. Do not invent facts that are not in \
the page.";

const SOCIAL_MEDIA_INSTRUCTION: &str = "You extract structured data from social media \
posts. Identify the platform, the author handle, the full post text as post_content, \
engagement counts (likes, shares, comments) when visible, hashtags without the leading \
'#', mentioned accounts and the publication date in ISO 8601.";

const CRYPTO_INSTRUCTION: &str = "You extract structured data from cryptocurrency news \
and market commentary. Capture title and content, every cryptocurrency discussed as \
{symbol, name}, the overall market sentiment (bullish, bearish or neutral), any price \
figures as price_data, the expected market impact, key events and regulatory mentions.";

const GENERAL_INSTRUCTION: &str = "You extract structured data from web pages. Capture \
the page title, a short summary, the main content and the key points a reader should \
take away.";

const BLOG_INSTRUCTION: &str = "You extract structured data from blog posts. Capture \
the post title, the author, the publication date in ISO 8601, the body as content, a \
short summary, tags and the key points.";

const FORUM_INSTRUCTION: &str = "You extract structured data from forum threads. Treat \
the forum as the platform, the opening post author as author and the opening post as \
post_content. Record reply counts under engagement.comments and any hashtags or \
mentioned users.";

const RESEARCH_INSTRUCTION: &str = "You extract structured data from research papers \
and studies. Capture the paper title, the authors as author, the abstract as summary, \
the main findings as content and key_points, the field of study as category and \
keywords as tags.";

/// Default instruction for a content type
pub fn default_instruction(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::News => NEWS_INSTRUCTION,
        ContentType::SocialMedia => SOCIAL_MEDIA_INSTRUCTION,
        ContentType::Crypto => CRYPTO_INSTRUCTION,
        ContentType::General => GENERAL_INSTRUCTION,
        ContentType::Blog => BLOG_INSTRUCTION,
        ContentType::Forum => FORUM_INSTRUCTION,
        ContentType::Research => RESEARCH_INSTRUCTION,
    }
}

/// Strategy for a content type, named after it, with the registry's schema
pub fn preset<L: LlmProvider>(
    content_type: ContentType,
    llm: L,
    schemas: &SchemaRegistry,
) -> LlmExtractionStrategy<L> {
    LlmExtractionStrategy::new(content_type.as_str(), content_type, llm)
        .with_instruction(default_instruction(content_type))
        .with_schema(schemas.schema_for(content_type))
}

/// Register one preset per content type, all sharing `llm`
///
/// Every preset caps page content at `max_content_chars`.
pub fn register_presets<L: LlmProvider + 'static>(
    registry: &mut StrategyRegistry,
    llm: Arc<L>,
    schemas: &SchemaRegistry,
    max_content_chars: usize,
) {
    for content_type in ContentType::ALL {
        let strategy = preset(content_type, Arc::clone(&llm), schemas)
            .with_max_content_chars(max_content_chars);
        registry.register(Arc::new(strategy));
    }
}
