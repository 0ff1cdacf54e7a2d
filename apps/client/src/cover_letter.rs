//! Cover-letter generation — the job tracker's one remote action.
//!
//! `POST /cover-letter/generate` with `{ "job_description": .. }`.
//! The server answers `{ "cover_letter": .. }`, or `{ "error": .. }` with a 400
//! (no CV on file, empty description) or a 500 (LLM failure).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::{ActionRequest, RemoteActionController, RenderHook};
use crate::errors::ActionError;
use crate::transport::Transport;

pub const GENERATE_ENDPOINT: &str = "/cover-letter/generate";
pub const RESULT_FIELD: &str = "cover_letter";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub job_description: String,
}

impl CoverLetterRequest {
    pub fn new(job_description: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
        }
    }

    /// Builds the action request. A blank description is rejected here since
    /// the server would only bounce it with a 400.
    pub fn into_action(self) -> Result<ActionRequest, ActionError> {
        if self.job_description.trim().is_empty() {
            return Err(ActionError::Validation(
                "Job description is required.".to_string(),
            ));
        }
        ActionRequest::from_serializable(GENERATE_ENDPOINT, &self)
    }
}

/// A controller that reads the letter from the `cover_letter` field.
pub fn controller(
    transport: Arc<dyn Transport>,
    hook: Arc<dyn RenderHook>,
) -> RemoteActionController {
    RemoteActionController::new(transport, hook).with_result_field(RESULT_FIELD)
}
