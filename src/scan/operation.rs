//! The caller-selected operation a scan should perform, and its static
//! mapping onto HTTP routes. Every route is a POST; the mapping is total over
//! the defined variants, and the string-level parsers used by callers fall
//! back to a documented default instead of failing a scan on unknown input.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

/// A physical gate where entry or exit is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Checkpoint {
    MainGate,
    ConcertArea,
}

impl Checkpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Checkpoint::MainGate => "main-gate",
            Checkpoint::ConcertArea => "concert-area",
        }
    }

    /// Unrecognized input maps to the default checkpoint (main-gate).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "concert-area" => Checkpoint::ConcertArea,
            _ => Checkpoint::MainGate,
        }
    }
}

impl Display for Checkpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateAction {
    Entry,
    Exit,
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateAction::Entry => "entry",
            GateAction::Exit => "exit",
        }
    }

    /// Unrecognized input maps to the default action (entry).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "exit" => GateAction::Exit,
            _ => GateAction::Entry,
        }
    }
}

impl Display for GateAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// The event-family endpoints: attendance marking and ID-badge custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventEndpoint {
    Mark,
    Unmark,
    Collect,
    Return,
}

impl EventEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventEndpoint::Mark => "mark",
            EventEndpoint::Unmark => "unmark",
            EventEndpoint::Collect => "collect",
            EventEndpoint::Return => "return",
        }
    }

    /// Unrecognized input maps to the default endpoint (mark).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "unmark" => EventEndpoint::Unmark,
            "collect" => EventEndpoint::Collect,
            "return" => EventEndpoint::Return,
            _ => EventEndpoint::Mark,
        }
    }
}

impl Display for EventEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// One scan's target: entry/exit at a checkpoint, or an attendance/ID action
/// against an event registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Operation {
    Gate {
        checkpoint: Checkpoint,
        action: GateAction,
    },
    Event {
        registration_id: String,
        user_id: String,
        event_id: String,
        endpoint: EventEndpoint,
    },
}

impl Operation {
    /// The HTTP route for this operation, relative to the API base. Total:
    /// every variant maps to exactly one route.
    pub fn route(&self) -> String {
        match self {
            Operation::Gate { checkpoint, action } => {
                format!("{}/{}", action.as_str(), checkpoint.as_str())
            }
            Operation::Event { endpoint, .. } => match endpoint {
                EventEndpoint::Mark => "attendance/mark".to_string(),
                EventEndpoint::Unmark => "attendance/unmark".to_string(),
                EventEndpoint::Collect => "id/collect".to_string(),
                EventEndpoint::Return => "id/return".to_string(),
            },
        }
    }

    /// The JSON request body for this operation, carrying the extracted
    /// identifier (plus the registration coordinates for the event family).
    pub fn request_body(&self, identifier: &str) -> Value {
        match self {
            Operation::Gate { .. } => json!({ "identifier": identifier }),
            Operation::Event { registration_id, user_id, event_id, .. } => json!({
                "identifier": identifier,
                "registrationId": registration_id,
                "userId": user_id,
                "eventId": event_id,
            }),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Gate { checkpoint, action } => write!(f, "{action} at {checkpoint}"),
            Operation::Event { endpoint, event_id, .. } => write!(f, "{endpoint} for event {event_id}"),
        }
    }
}
