//! Identifier extraction from a raw scanner read.

use serde_json::Value;

/// Pull the subject identifier out of whatever the scanner produced.
///
/// Badges encode either a bare identifier or a small JSON object whose
/// `token` field carries it. A payload that is not JSON, or is JSON without a
/// string `token` field, is used verbatim. This never fails: a parse error
/// just means "not JSON".
pub fn extract_identifier(raw_payload: &str) -> String {
    match serde_json::from_str::<Value>(raw_payload) {
        Ok(v) => v
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| raw_payload.to_string()),
        Err(_) => raw_payload.to_string(),
    }
}
