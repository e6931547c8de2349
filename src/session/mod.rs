//! Operator session: the persisted login record and its encrypted store.
//! Keep the public surface thin and split implementation across sub-modules.

mod record;
mod store;

pub use record::{EventRef, Scope, Session};
pub use store::{KeyringBackend, MemoryBackend, SecretBackend, SessionStore, StoreError};
