//! Response classification: the pure reduction from (HTTP status, body) to a
//! `ScanOutcome`.
//!
//! Ladder order matters and is fixed here: HTTP failure → business rejection;
//! HTTP success with success=false or no data → acknowledgement; FACULTY
//! detection before the generic person fallback (the two upstream deployments
//! disagreed on this order; FACULTY-first is the documented choice, see
//! DESIGN.md). Classification never panics: any shape surprise degrades to
//! `Acknowledged` or `Rejected`.

use reqwest::StatusCode;
use serde_json::Value;

use super::outcome::ScanOutcome;

/// Faculty counters lifted from `data`, with their outward names. Only keys
/// present in the response make it into the outcome, in this order.
const FACULTY_ATTRS: [(&str, &str); 4] = [
    ("entryCount", "entryCount"),
    ("remainingConcertEntries", "remainingEntries"),
    ("status", "status"),
    ("currentLocation", "location"),
];

/// Reduce one HTTP response to a `ScanOutcome`. Transport-level failures
/// (timeout, connection error) never reach this function; the client maps
/// those to `TransportFailure` directly.
pub fn classify(status: u16, body: &str) -> ScanOutcome {
    if !(200..300).contains(&status) {
        return classify_failure(status, body);
    }

    let root: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return ScanOutcome::TransportFailure {
                reason: format!("response body is not JSON: {e}"),
            }
        }
    };

    let success = root.get("success").and_then(Value::as_bool).unwrap_or(false);
    let message = message_of(&root).unwrap_or_else(|| "Success".to_string());

    if !success {
        // A structurally successful call can still carry a negative business
        // outcome as a bare message ("already marked").
        return ScanOutcome::Acknowledged { message, user_type: None };
    }

    let Some(data) = root.get("data").filter(|d| d.is_object()) else {
        return ScanOutcome::Acknowledged { message, user_type: None };
    };

    let user_type = data.get("userType").and_then(Value::as_str);

    if user_type == Some("FACULTY") {
        let attributes = FACULTY_ATTRS
            .iter()
            .filter_map(|(key, renamed)| {
                data.get(*key).map(|v| (renamed.to_string(), stringify(v)))
            })
            .collect();
        return ScanOutcome::FacultyMatched { message, attributes };
    }

    if let Some(student) = data.get("student").filter(|s| s.is_object()) {
        return ScanOutcome::PersonMatched {
            name: str_or_empty(student, "name"),
            organization: str_or_empty(student, "college"),
            sub_organization: str_or_empty(student, "department"),
            year: student.get("year").and_then(Value::as_i64),
            section: opt_str(student, "section"),
            photo_url: opt_str(student, "photoUrl"),
            uid: str_or_empty(student, "uid"),
            secondary_id: str_or_empty(student, "usn"),
            message,
        };
    }

    ScanOutcome::Acknowledged {
        message,
        user_type: user_type.map(str::to_string),
    }
}

/// HTTP-level failure: prefer the server's own `message`, otherwise fall back
/// to "<status> - <raw body or status text>".
fn classify_failure(status: u16, body: &str) -> ScanOutcome {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(message) = message_of(&v) {
            return ScanOutcome::Rejected { message, status: Some(status) };
        }
    }
    let detail = if body.trim().is_empty() {
        StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("error")
            .to_string()
    } else {
        body.trim().to_string()
    };
    ScanOutcome::Rejected {
        message: format!("{status} - {detail}"),
        status: Some(status),
    }
}

// Non-empty `message` field, if any. An empty message is treated as absent so
// every outcome keeps a renderable line.
fn message_of(v: &Value) -> Option<String> {
    v.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn stringify(v: &Value) -> String {
    match v.as_str() {
        Some(s) => s.to_string(),
        None => v.to_string(),
    }
}

fn str_or_empty(obj: &Value, key: &str) -> String {
    obj.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

fn opt_str(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
