//! Parse LLM completions into extraction results

use crate::error::ExtractorError;
use serde_json::Value;
use urlsift_domain::ExtractionResult;

/// Parse a completion as a JSON object
///
/// # Errors
///
/// Returns [`ExtractorError::ContentParse`] if the content is not valid JSON
/// or not an object.
pub fn parse_extraction(content: &str) -> Result<ExtractionResult, ExtractorError> {
    let json_str = extract_json(content)?;

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::ContentParse(format!("JSON parse error: {}", e)))?;

    ExtractionResult::from_value(value)
        .ok_or_else(|| ExtractorError::ContentParse("Expected a JSON object".to_string()))
}

/// Extract JSON from a completion, handling markdown code blocks
fn extract_json(content: &str) -> Result<&str, ExtractorError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ExtractorError::ContentParse("Empty completion".to_string()));
    }

    if let Some(fenced) = trimmed.strip_prefix("```") {
        // Drop the language tag line, then the closing fence
        let body = match fenced.find('\n') {
            Some(newline) => &fenced[newline + 1..],
            None => return Err(ExtractorError::ContentParse("Empty code block".to_string())),
        };
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        return Ok(body.trim());
    }

    Ok(trimmed)
}
