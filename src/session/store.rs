//! Encrypted, process-durable persistence for the operator session.
//!
//! The record is serialized to JSON and held as a single secret in the
//! platform keystore (Keychain, Credential Manager, Secret Service), which
//! provides encryption at rest and key custody. Losing the keystore entry,
//! or finding an undecodable payload in it, degrades to "logged out" rather
//! than failing the caller.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

use super::record::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("keystore failure: {0}")]
    Keystore(String),
    #[error("session record is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Single-slot secret persistence. The production backend is the platform
/// keystore; tests and headless hosts use the in-memory backend.
pub trait SecretBackend: Send + Sync {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, value: &str) -> Result<(), StoreError>;
    fn delete(&self) -> Result<(), StoreError>;
}

/// Platform keystore backend: one `keyring` entry per (service, account).
pub struct KeyringBackend {
    entry: keyring::Entry,
}

impl KeyringBackend {
    pub fn new(service: &str, account: &str) -> Result<Self, StoreError> {
        let entry = keyring::Entry::new(service, account)
            .map_err(|e| StoreError::Keystore(e.to_string()))?;
        Ok(Self { entry })
    }
}

impl SecretBackend for KeyringBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match self.entry.get_password() {
            Ok(v) => Ok(Some(v)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keystore(e.to_string())),
        }
    }

    fn write(&self, value: &str) -> Result<(), StoreError> {
        self.entry
            .set_password(value)
            .map_err(|e| StoreError::Keystore(e.to_string()))
    }

    fn delete(&self) -> Result<(), StoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keystore(e.to_string())),
        }
    }
}

/// In-memory backend for tests and for hosts without a usable keystore.
#[derive(Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl SecretBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, value: &str) -> Result<(), StoreError> {
        *self.slot.lock() = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Durable single-record store for the operator session.
///
/// `save`/`clear` are atomic with respect to `load`: all three run under one
/// mutex, so no reader ever observes a partially written record.
pub struct SessionStore {
    backend: Box<dyn SecretBackend>,
    guard: Mutex<()>,
}

impl SessionStore {
    /// Open the platform-keystore-backed store. Keystore unavailability is a
    /// fatal configuration error surfaced here, once, rather than per call.
    pub fn open(service: &str, account: &str) -> AppResult<Self> {
        let backend = KeyringBackend::new(service, account)
            .map_err(|e| AppError::config("keystore_unavailable", e.to_string()))?;
        let store = Self::with_backend(Box::new(backend));
        // Probe the keystore so a broken platform backend fails at startup.
        {
            let _g = store.guard.lock();
            if let Err(e) = store.backend.read() {
                return Err(AppError::config("keystore_unavailable", e.to_string()));
            }
        }
        Ok(store)
    }

    pub fn with_backend(backend: Box<dyn SecretBackend>) -> Self {
        Self { backend, guard: Mutex::new(()) }
    }

    /// Persist the session, overwriting any previous record. Never fails the
    /// caller-visible flow: a backend write error is logged and the operator
    /// simply stays logged out on the next load.
    pub fn save(&self, session: &Session) {
        let payload = match serde_json::to_string(session) {
            Ok(p) => p,
            Err(e) => {
                warn!("session serialize failed: {e}");
                return;
            }
        };
        let _g = self.guard.lock();
        match self.backend.write(&payload) {
            Ok(()) => debug!(username = %session.username, "session saved"),
            Err(e) => warn!("session save failed: {e}"),
        }
    }

    /// Read the persisted session. Returns `None` when nothing was saved,
    /// after `clear`, when the keystore entry is gone, or when the stored
    /// payload no longer decodes.
    pub fn load(&self) -> Option<Session> {
        let _g = self.guard.lock();
        let raw = match self.backend.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("session load failed, treating as logged out: {e}");
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("stored session is undecodable, treating as logged out: {e}");
                None
            }
        }
    }

    /// Erase the persisted record. Idempotent.
    pub fn clear(&self) {
        let _g = self.guard.lock();
        if let Err(e) = self.backend.delete() {
            warn!("session clear failed: {e}");
        }
    }

    /// True iff a session is stored and its token is non-empty.
    pub fn is_authenticated(&self) -> bool {
        self.load().map(|s| s.is_authenticated()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Scope;

    fn session(token: &str) -> Session {
        Session {
            token: token.into(),
            username: "gate7".into(),
            role: "scanner".into(),
            scope: Scope::Gates { assigned_gates: vec!["main-gate".into()] },
        }
    }

    fn mem_store() -> SessionStore {
        SessionStore::with_backend(Box::<MemoryBackend>::default())
    }

    #[test]
    fn save_load_round_trip() {
        let store = mem_store();
        let s = session("tok-123");
        store.save(&s);
        assert_eq!(store.load(), Some(s));
        assert!(store.is_authenticated());
    }

    #[test]
    fn clear_is_idempotent() {
        let store = mem_store();
        store.save(&session("tok-123"));
        store.clear();
        assert_eq!(store.load(), None);
        store.clear();
        assert_eq!(store.load(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let store = mem_store();
        store.save(&session(""));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn corrupt_payload_degrades_to_logged_out() {
        let backend = MemoryBackend::default();
        backend.write("{not json").unwrap();
        let store = SessionStore::with_backend(Box::new(backend));
        assert_eq!(store.load(), None);
    }
}
