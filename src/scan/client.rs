//! Dispatch: one scanned payload + one operation → exactly one HTTP call →
//! one `ScanOutcome`.

use std::sync::Arc;

use tracing::debug;

use crate::session::SessionStore;

use super::classify::classify;
use super::operation::Operation;
use super::outcome::ScanOutcome;
use super::payload::extract_identifier;
use super::transport::ScanTransport;

/// Stateless per-call scan client. Concurrent calls are safe (each one only
/// reads the session token); preventing two physical actions from racing is
/// the caller's job, the UI disables its trigger while a scan is in flight.
pub struct ScanResultClient {
    transport: Arc<dyn ScanTransport>,
    store: Arc<SessionStore>,
}

impl ScanResultClient {
    pub fn new(transport: Arc<dyn ScanTransport>, store: Arc<SessionStore>) -> Self {
        Self { transport, store }
    }

    /// Submit one scan. Issues exactly one request: no automatic retry, since
    /// a retry could record a physical action (a gate entry) twice. The only
    /// suspension point is the network round trip; dropping the future
    /// cancels the request and no state is touched afterwards.
    pub async fn submit(&self, raw_payload: &str, operation: &Operation) -> ScanOutcome {
        let identifier = extract_identifier(raw_payload);
        let token = self.store.load().map(|s| s.token).unwrap_or_default();
        let route = operation.route();
        let body = operation.request_body(&identifier);
        let prefix: String = identifier.chars().take(12).collect();
        debug!(route = %route, identifier_prefix = %prefix, "submitting scan");

        let bearer = if token.is_empty() { None } else { Some(token.as_str()) };
        match self.transport.post_json(&route, &body, bearer).await {
            Ok(raw) => classify(raw.status, &raw.body),
            Err(e) => ScanOutcome::TransportFailure { reason: e.to_string() },
        }
    }
}
