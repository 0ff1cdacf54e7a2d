//! Transport — the single seam through which remote actions reach the network.
//!
//! A transport only reports whether a response was obtained. Status codes and
//! body shapes are judged later by `action::normalize`, so a 500 is a
//! successful transport call here.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ActionError;

pub mod http;

pub use http::HttpTransport;

/// A settled HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Carried by the controller as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `payload` as JSON to `endpoint`.
    /// Errors only when no response could be obtained (`ActionError::Network`).
    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<TransportResponse, ActionError>;
}
