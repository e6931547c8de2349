//! Environment-driven configuration for the client and CLI.
//! All knobs have defaults so the CLI starts with just AURAGATE_BASE_URL set.

use std::time::Duration;

use reqwest::Url;

use crate::error::{AppError, AppResult};

pub const ENV_BASE_URL: &str = "AURAGATE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "AURAGATE_TIMEOUT_SECS";
pub const ENV_KEYRING_SERVICE: &str = "AURAGATE_KEYRING_SERVICE";
pub const ENV_KEYRING_ACCOUNT: &str = "AURAGATE_KEYRING_ACCOUNT";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_KEYRING_SERVICE: &str = "auragate";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the event-operations API, e.g. `https://ops.example.org/api/`.
    pub base_url: Url,
    /// Hard bound on one scan round trip. Expiry classifies as a transport
    /// failure; there is no retry.
    pub request_timeout: Duration,
    /// Keystore service/account under which the session record is held.
    pub keyring_service: String,
    pub keyring_account: String,
}

impl Config {
    /// Read configuration from AURAGATE_* environment variables.
    /// Unset timeout/keyring values fall back to defaults; an unset or
    /// unparseable base URL is a configuration error.
    pub fn from_env() -> AppResult<Self> {
        let raw = std::env::var(ENV_BASE_URL)
            .map_err(|_| AppError::config("base_url_missing", format!("{ENV_BASE_URL} is not set")))?;
        Self::with_base_url(&raw)
    }

    pub fn with_base_url(base: &str) -> AppResult<Self> {
        let base_url = Url::parse(base)
            .map_err(|e| AppError::config("base_url_invalid", format!("invalid base URL '{base}': {e}")))?;
        let secs = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let keyring_service = std::env::var(ENV_KEYRING_SERVICE)
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        let keyring_account = std::env::var(ENV_KEYRING_ACCOUNT)
            .unwrap_or_else(|_| whoami::username());
        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(secs),
            keyring_service,
            keyring_account,
        })
    }
}
