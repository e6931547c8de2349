//! The injected HTTP transport seam.
//!
//! The client never talks to reqwest directly: it goes through `ScanTransport`
//! so tests (and alternative shells) can substitute the wire. The production
//! transport is a thin reqwest wrapper with a hard per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use crate::error::{AppError, AppResult};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("error reading response body: {0}")]
    Body(String),
}

/// Status and raw body of one response, before classification. The body is
/// kept as text because the scan endpoints answer with a loosely shaped JSON
/// envelope that is parsed downstream.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// One POST with a JSON body against a route relative to the API base.
/// `bearer`, when present, is sent as `Authorization: Bearer <token>`.
#[async_trait]
pub trait ScanTransport: Send + Sync {
    async fn post_json(
        &self,
        route: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport. Cancellation is dropping the returned future:
/// reqwest aborts the in-flight request and nothing observes the response.
pub struct HttpTransport {
    base: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base: Url, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config("http_client", e.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl ScanTransport for HttpTransport {
    async fn post_json(
        &self,
        route: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let url = self
            .base
            .join(route)
            .map_err(|e| TransportError::Connect(format!("bad route '{route}': {e}")))?;
        let mut req = self.client.post(url).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(map_send_error)?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

fn map_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(e.to_string())
    }
}
