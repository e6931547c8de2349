//! The persisted operator record: token plus the minimal profile and the
//! checkpoint/event scope the deployment assigned to this operator.

use serde::{Deserialize, Serialize};

/// One event an operator may scan against (entry/exit deployments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub id: String,
    pub name: String,
}

/// Which checkpoints or events this operator may act on. The two deployment
/// variants scope operators differently; both shapes round-trip through the
/// same store record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// Gate deployments: a set of named gates.
    Gates { assigned_gates: Vec<String> },
    /// Event deployments: scanner identity plus assigned events and a
    /// scan-all override.
    Events {
        scanner_id: String,
        scanner_name: String,
        assigned_events: Vec<EventRef>,
        can_scan_all_events: bool,
    },
}

/// The authenticated operator. Created on successful login, persisted
/// immediately, read on every scan request, destroyed wholesale on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer credential; required for all scan requests.
    pub token: String,
    pub username: String,
    pub role: String,
    pub scope: Scope,
}

impl Session {
    /// A session authenticates its holder iff the token is non-empty.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
