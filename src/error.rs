//! Unified application error model.
//! This module provides the common error enum surfaced to callers of the core
//! facade (CLI, UI shells). Business rejections and transport failures during a
//! scan are NOT errors: they travel inside `ScanOutcome` (see `scan::outcome`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Login failed: bad credentials or a network failure during login.
    /// The message is surfaced verbatim to the operator.
    Auth { code: String, message: String },
    /// The encrypted session store could not be initialised (platform
    /// keystore unavailable). Fatal, reported once at startup.
    Config { code: String, message: String },
    /// A session store read/write failed after initialisation.
    Store { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::Config { code, .. }
            | AppError::Store { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::Config { message, .. }
            | AppError::Store { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn auth(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn config(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn store(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Store { code: code.into(), message: msg.into() } }
    pub fn internal(code: impl Into<String>, msg: impl Into<String>) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal".into(), message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let e = AppError::auth("invalid_credentials", "Login failed");
        assert_eq!(e.code_str(), "invalid_credentials");
        assert_eq!(e.message(), "Login failed");
        assert_eq!(e.to_string(), "invalid_credentials: Login failed");
    }

    #[test]
    fn serde_tagging() {
        let e = AppError::config("keystore_unavailable", "no secret service");
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "config");
        assert_eq!(v["code"], "keystore_unavailable");
    }
}
