//! Remote actions — one user-triggered POST with single-flight execution and
//! a render hook that mirrors its lifecycle.
//!
//! `RemoteActionController` owns the state machine, `normalize` turns a raw
//! HTTP exchange into a value or an `ActionError`, and `render` holds the UI
//! seam. Transports live in `crate::transport`.

pub mod controller;
pub mod normalize;
pub mod render;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::errors::ActionError;

pub use controller::RemoteActionController;
pub use render::{RenderEvent, RenderHook, RenderLog};

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// An immutable request: where to POST and what JSON body to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    endpoint: String,
    payload: Value,
}

impl ActionRequest {
    pub fn new(endpoint: impl Into<String>, payload: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            payload,
        }
    }

    /// Builds a request from any serializable record.
    pub fn from_serializable<T: Serialize>(
        endpoint: impl Into<String>,
        payload: &T,
    ) -> Result<Self, ActionError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| ActionError::Validation(format!("payload is not serializable: {e}")))?;
        Ok(Self::new(endpoint, payload))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Checks the constraints that must hold before anything is dispatched.
    pub fn validate(&self) -> Result<(), ActionError> {
        if self.endpoint.trim().is_empty() {
            return Err(ActionError::Validation(
                "endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lifecycle of a controller. Succeeded/Failed are transient: the controller
/// drops back to Idle once the terminal render has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    InFlight,
    Succeeded(String),
    Failed(String),
}

impl ActionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ActionState::InFlight)
    }
}

/// Normalized outcome of an action, identical in shape for every failure mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub ok: bool,
    pub value: Option<String>,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success(value: impl Into<String>) -> Self {
        Self {
            ok: true,
            value: Some(value.into()),
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            error: Some(reason.into()),
        }
    }
}

impl From<Result<String, ActionError>> for ActionResult {
    fn from(result: Result<String, ActionError>) -> Self {
        match result {
            Ok(value) => ActionResult::success(value),
            Err(e) => ActionResult::failure(e.reason()),
        }
    }
}

/// What an awaited `trigger` resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Another call was in flight; nothing happened.
    Ignored,
    /// The action settled and exactly one terminal render ran.
    Settled(ActionResult),
    /// The response arrived after a `reset()` and was discarded unrendered.
    Stale,
}

/// What a detached `spawn_trigger` did synchronously.
#[derive(Debug)]
pub enum Dispatch {
    Ignored,
    /// Settled without a network call (validation failure).
    Settled(ActionResult),
    Running(JoinHandle<TriggerOutcome>),
}
