//! Operator-facing facade: login, session checks, logout, scan submission.
//! UI shells and the CLI talk to this type only.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::scan::{HttpTransport, Operation, ScanOutcome, ScanResultClient, ScanTransport};
use crate::session::{Scope, Session, SessionStore};

const LOGIN_ROUTE: &str = "login";

/// Login response envelope (gate-deployment shape). Fields the server omits
/// default to empty rather than failing the decode.
#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: String,
    #[serde(default)]
    message: String,
    data: Option<LoginProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct LoginProfile {
    #[serde(default)]
    username: String,
    #[serde(default)]
    role: String,
    #[serde(rename = "assignedGates", default)]
    assigned_gates: Vec<String>,
}

/// The authenticated-operator client. Owns the transport and the encrypted
/// session store; hand one instance to whatever drives the scanner.
pub struct OperatorClient {
    transport: Arc<dyn ScanTransport>,
    store: Arc<SessionStore>,
    scans: ScanResultClient,
}

impl OperatorClient {
    /// Build the production client: reqwest transport against the configured
    /// base URL, session record in the platform keystore. Keystore
    /// unavailability surfaces here, once, as a configuration error.
    pub fn connect(config: &Config) -> AppResult<Self> {
        let transport = HttpTransport::new(config.base_url.clone(), config.request_timeout)?;
        let store = SessionStore::open(&config.keyring_service, &config.keyring_account)?;
        Ok(Self::with_parts(Arc::new(transport), Arc::new(store)))
    }

    /// Assemble from explicit parts. Tests inject a mock transport and an
    /// in-memory store here.
    pub fn with_parts(transport: Arc<dyn ScanTransport>, store: Arc<SessionStore>) -> Self {
        let scans = ScanResultClient::new(transport.clone(), store.clone());
        Self { transport, store, scans }
    }

    /// Authenticate against `POST <base>/login` and persist the session
    /// before returning it. Any failure surfaces as `AppError::Auth` with the
    /// server's message verbatim.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        let body = json!({ "username": username, "password": password });
        let raw = self
            .transport
            .post_json(LOGIN_ROUTE, &body, None)
            .await
            .map_err(|e| AppError::auth("login_network", e.to_string()))?;

        if !(200..300).contains(&raw.status) {
            let msg = if raw.body.trim().is_empty() {
                format!("Login failed (HTTP {})", raw.status)
            } else {
                raw.body.trim().to_string()
            };
            return Err(AppError::auth("login_failed", msg));
        }

        let envelope: LoginEnvelope = serde_json::from_str(&raw.body)
            .map_err(|e| AppError::auth("login_malformed", format!("malformed login response: {e}")))?;
        if !envelope.success || envelope.token.is_empty() {
            let msg = if envelope.message.is_empty() { "Login failed".to_string() } else { envelope.message };
            return Err(AppError::auth("login_failed", msg));
        }

        let profile = envelope.data.unwrap_or_default();
        let session = Session {
            token: envelope.token,
            username: profile.username,
            role: profile.role,
            scope: Scope::Gates { assigned_gates: profile.assigned_gates },
        };
        self.store.save(&session);
        info!(username = %session.username, role = %session.role, "login ok");
        Ok(session)
    }

    /// True iff a persisted session with a non-empty token exists.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// The persisted operator record, for profile display.
    pub fn session(&self) -> Option<Session> {
        self.store.load()
    }

    /// Erase the persisted session. Idempotent.
    pub fn logout(&self) {
        self.store.clear();
        debug!("logged out");
    }

    /// Submit one scanned payload against the selected operation.
    pub async fn submit_scan(&self, raw_payload: &str, operation: &Operation) -> ScanOutcome {
        self.scans.submit(raw_payload, operation).await
    }
}
