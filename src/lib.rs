//! auragate: event-operations scan client.
//!
//! Scan a QR/barcode at a checkpoint, post it to the deployment's HTTP API
//! (gate entry/exit, attendance mark/unmark, ID-badge collect/return), and
//! reduce the loosely shaped JSON answer into one typed [`ScanOutcome`].
//! The operator's login session is cached in the platform keystore via
//! [`session::SessionStore`].

pub mod client;
pub mod config;
pub mod error;
pub mod scan;
pub mod session;

pub use client::OperatorClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use scan::{Checkpoint, EventEndpoint, GateAction, Operation, ScanOutcome};
pub use session::{Scope, Session, SessionStore};
