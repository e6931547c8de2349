//! The single typed result of submitting one scan.

use serde::{Deserialize, Serialize};

/// What one scan came back as. Exactly one case; `message` is present and
/// non-empty for every case except `TransportFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The server matched the scan to a person record (student shape).
    PersonMatched {
        name: String,
        organization: String,
        sub_organization: String,
        year: Option<i64>,
        section: Option<String>,
        photo_url: Option<String>,
        uid: String,
        secondary_id: String,
        message: String,
    },
    /// The server matched a faculty member: a message plus whichever of the
    /// known faculty counters were present in the response, in a fixed order.
    FacultyMatched {
        message: String,
        attributes: Vec<(String, String)>,
    },
    /// Structurally successful call with no structured subject, including
    /// success=false business outcomes carried only as a message
    /// (e.g. "already marked").
    Acknowledged {
        message: String,
        user_type: Option<String>,
    },
    /// Server-confirmed business failure (already scanned, invalid QR, ...).
    Rejected {
        message: String,
        status: Option<u16>,
    },
    /// The call itself failed: no connectivity, timeout, unparseable body.
    /// Not a business decision.
    TransportFailure { reason: String },
}

impl ScanOutcome {
    /// The human-readable line the caller renders.
    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::PersonMatched { message, .. }
            | ScanOutcome::FacultyMatched { message, .. }
            | ScanOutcome::Acknowledged { message, .. }
            | ScanOutcome::Rejected { message, .. } => message,
            ScanOutcome::TransportFailure { reason } => reason,
        }
    }

    /// True for the outcomes a gate operator treats as "let them through".
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            ScanOutcome::PersonMatched { .. } | ScanOutcome::FacultyMatched { .. }
        )
    }
}
