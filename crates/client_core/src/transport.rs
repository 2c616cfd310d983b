use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// JSON-over-HTTP capability used by the controller. A returned `Err` means
/// the request never completed; HTTP error statuses come back as `Ok`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: Value) -> Result<TransportResponse, ChatError>;
}

pub struct HttpTransport {
    http: Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    /// Without a timeout a hung backend keeps the caller suspended indefinitely.
    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            server_url: server_url.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<TransportResponse, ChatError> {
        let url = format!("{}{path}", self.server_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        debug!(url = %url, status, bytes = body.len(), "http: response received");
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
