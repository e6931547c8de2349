//! Scan submission pipeline: payload → operation route → one HTTP dispatch →
//! typed outcome. Split across sub-modules; the public surface is re-exported
//! here.

mod classify;
mod client;
mod operation;
mod outcome;
mod payload;
mod transport;

pub use classify::classify;
pub use client::ScanResultClient;
pub use operation::{Checkpoint, EventEndpoint, GateAction, Operation};
pub use outcome::ScanOutcome;
pub use payload::extract_identifier;
pub use transport::{HttpTransport, RawResponse, ScanTransport, TransportError};
