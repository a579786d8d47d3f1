//! Defensive parsing of model output into [`AdContent`].
//!
//! The text backend's answer is untrusted: it may be empty, wrapped in a
//! Markdown fence, not JSON, or JSON of the wrong shape. Every failure maps to
//! a [`ContentGenerationError`].

use adcraft_utils::error::ContentGenerationError;
use serde_json::Value;

use crate::model::AdContent;

/// Parse the raw response of the content request.
///
/// # Errors
///
/// - [`ContentGenerationError::EmptyResponse`] when the text is blank
/// - [`ContentGenerationError::Malformed`] when it is not JSON, not an object,
///   or misses a required field / has a field of the wrong type
pub fn parse_ad_content(raw: &str) -> Result<AdContent, ContentGenerationError> {
    let text = strip_code_fence(raw.trim());
    if text.is_empty() {
        return Err(ContentGenerationError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ContentGenerationError::Malformed(format!("not valid JSON ({e})")))?;

    if !value.is_object() {
        return Err(ContentGenerationError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| ContentGenerationError::Malformed(e.to_string()))
}

/// Remove a surrounding ```` ```json ```` fence if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
