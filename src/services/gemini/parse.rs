use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::errors::GeminiError;
use crate::models::EmailDraft;

lazy_static! {
    static ref LEADING_JSON_FENCE: Regex = Regex::new(r"(?i)^```json\s*").unwrap();
    static ref LEADING_FENCE: Regex = Regex::new(r"^```\s*").unwrap();
    static ref TRAILING_FENCE: Regex = Regex::new(r"```\s*$").unwrap();
    static ref SUBJECT_FIELD: Regex = Regex::new(r#""subject"\s*:\s*"([\s\S]*?)""#).unwrap();
    static ref BODY_FIELD: Regex = Regex::new(r#""body"\s*:\s*"([\s\S]*?)""#).unwrap();
}

/// Removes a surrounding Markdown code fence, with or without a `json` tag.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let without_json_fence = LEADING_JSON_FENCE.replace(trimmed, "");
    let without_fence = LEADING_FENCE.replace(&without_json_fence, "");
    TRAILING_FENCE.replace(&without_fence, "").trim().to_string()
}

/// Turns raw model output into a draft. Strict JSON is tried first; when
/// that fails the two fields are pulled out of the text directly.
pub fn parse_email_draft(text: &str) -> Result<EmailDraft, GeminiError> {
    let (subject, body) = match serde_json::from_str::<Value>(&strip_code_fence(text)) {
        Ok(value) => (string_field(&value, "subject"), string_field(&value, "body")),
        Err(_) => salvage_fields(text),
    };

    // Whitespace-only fields count as missing; accepted values are trimmed.
    match (subject, body) {
        (Some(subject), Some(body)) if !subject.trim().is_empty() && !body.trim().is_empty() => {
            Ok(EmailDraft {
                subject: subject.trim().to_string(),
                body: body.trim().to_string(),
            })
        }
        _ => Err(GeminiError::ParseError {
            message: "Gemini output is not the expected JSON object with subject and body"
                .to_string(),
        }),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    // Booleans, nulls, arrays and objects have no sensible text form for an email.
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn salvage_fields(text: &str) -> (Option<String>, Option<String>) {
    let subject = capture_json_string(&SUBJECT_FIELD, text);
    let body = capture_json_string(&BODY_FIELD, text);
    match (subject, body) {
        (Some(subject), Some(body)) => (Some(subject), Some(body)),
        _ => (None, None),
    }
}

// The capture is still JSON-escaped; decode it as a string literal.
fn capture_json_string(pattern: &Regex, text: &str) -> Option<String> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    serde_json::from_str::<String>(&format!("\"{raw}\"")).ok()
}
