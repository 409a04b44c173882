//! Prompt construction for extraction calls

use serde_json::Value;

/// Marker appended when page content is cut short
const TRUNCATION_MARKER: &str = "\n[... content truncated ...]";

/// Build the system message: instruction plus optional schema guidance
///
/// The model is not guaranteed to honor the schema; results are validated
/// downstream.
pub fn build_system_message(instruction: &str, schema: Option<&Value>) -> String {
    let mut message = instruction.trim().to_string();

    if let Some(schema) = schema {
        let rendered =
            serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
        message.push_str("\n\nReturn a single JSON object that follows this JSON Schema:\n");
        message.push_str("```json\n");
        message.push_str(&rendered);
        message.push_str("\n```");
    }

    message.push_str("\n\nRespond with JSON only, no additional text.");
    message
}

/// Build the user message carrying the page
pub fn build_user_message(url: &str, content: &str, max_chars: usize) -> String {
    format!(
        "URL: {}\n\nPage content:\n---\n{}\n---",
        url,
        truncate_chars(content, max_chars)
    )
}

/// Cut `content` to at most `max_chars` characters, on a char boundary
pub fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{}", &content[..byte_index], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}
