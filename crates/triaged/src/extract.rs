//! JSON extraction from free-form LLM output.
//!
//! The collaborator returns prose that usually embeds a JSON object,
//! sometimes inside a fenced code block. Extraction rule: prefer the
//! content of a ```json fence; otherwise take the substring from the
//! first `{` to the last `}`. Parse failure is a typed error, never a
//! panic.

use serde::de::DeserializeOwned;
use triage_common::TriageError;

/// Locate the most plausible JSON object inside raw completion text.
fn candidate(raw: &str) -> Option<&str> {
    if let Some(fence) = raw.find("```json") {
        let rest = &raw[fence + "```json".len()..];
        return match rest.find("```") {
            Some(end) => Some(&rest[..end]),
            None => Some(rest),
        };
    }

    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last < first {
        return None;
    }
    Some(&raw[first..=last])
}

/// Extract and parse an untyped JSON object.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, TriageError> {
    let text = candidate(raw)
        .ok_or_else(|| TriageError::InvalidJson("no JSON object found".to_string()))?;
    serde_json::from_str(text.trim()).map_err(|e| TriageError::InvalidJson(e.to_string()))
}

/// Extract and deserialize into a typed payload.
pub fn extract_as<T: DeserializeOwned>(raw: &str) -> Result<T, TriageError> {
    let text = candidate(raw)
        .ok_or_else(|| TriageError::InvalidJson("no JSON object found".to_string()))?;
    serde_json::from_str(text.trim()).map_err(|e| TriageError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        question: String,
        options: Vec<String>,
    }

    #[test]
    fn test_extracts_from_json_fence() {
        let raw = "Here you go:\n```json\n{\"question\": \"When?\", \"options\": [\"now\"]}\n```\nHope that helps!";
        let payload: Payload = extract_as(raw).unwrap();
        assert_eq!(payload.question, "When?");
        assert_eq!(payload.options, vec!["now"]);
    }

    #[test]
    fn test_extracts_from_prose_wrapped_braces() {
        let raw = "Sure! {\"question\": \"Where?\", \"options\": []} -- done";
        let payload: Payload = extract_as(raw).unwrap();
        assert_eq!(payload.question, "Where?");
    }

    #[test]
    fn test_unterminated_fence_still_parses() {
        let raw = "```json\n{\"question\": \"Why?\", \"options\": []}";
        let payload: Payload = extract_as(raw).unwrap();
        assert_eq!(payload.question, "Why?");
    }

    #[test]
    fn test_no_object_is_invalid_json_error() {
        let err = extract_json("no braces here at all").unwrap_err();
        assert!(err.to_string().starts_with("invalid_json:"));
    }

    #[test]
    fn test_malformed_object_is_invalid_json_error() {
        let err = extract_json("{\"question\": }").unwrap_err();
        assert!(matches!(err, TriageError::InvalidJson(_)));
    }

    #[test]
    fn test_nested_braces_survive_first_to_last_rule() {
        let raw = "prefix {\"a\": {\"b\": 1}} suffix";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["a"]["b"], 1);
    }
}
