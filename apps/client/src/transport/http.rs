use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ActionError;
use crate::transport::{Transport, TransportResponse};

/// Default request timeout. The controller enforces none of its own, so this
/// is what guarantees every call eventually settles.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// reqwest-backed transport rooted at the job tracker's base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Fails only if the underlying reqwest client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute endpoints pass through; relative ones are joined to the base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<TransportResponse, ActionError> {
        let url = self.resolve(endpoint);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, "request failed: {e}");
                ActionError::from(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(%url, status, bytes = body.len(), "response received");

        Ok(TransportResponse { status, body })
    }
}
