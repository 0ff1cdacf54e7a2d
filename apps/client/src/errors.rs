use thiserror::Error;

/// Every way a remote action can fail.
///
/// The `Display` output is the human-readable reason handed to
/// `RenderHook::on_failed`, so variants read as sentences a user can act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Error contacting server: {0}")]
    Network(String),

    #[error("{}", http_reason(*status, message.as_deref()))]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("malformed response")]
    MalformedResponse,

    #[error("{0}")]
    Application(String),
}

impl ActionError {
    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::Validation(_) => "VALIDATION_ERROR",
            ActionError::Network(_) => "NETWORK_ERROR",
            ActionError::Http { .. } => "HTTP_ERROR",
            ActionError::MalformedResponse => "MALFORMED_RESPONSE",
            ActionError::Application(_) => "APPLICATION_ERROR",
        }
    }

    /// The reason string rendered to the user. Never empty.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

fn http_reason(status: u16, message: Option<&str>) -> String {
    match message {
        Some(msg) => format!("Server returned {status}: {msg}"),
        None => format!("Server returned {status}"),
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ActionError::Network(format!("request timed out ({e})"))
        } else {
            ActionError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_reason_includes_server_message() {
        let err = ActionError::Http {
            status: 400,
            message: Some("No CV uploaded or unable to read CV.".to_string()),
        };
        assert_eq!(
            err.reason(),
            "Server returned 400: No CV uploaded or unable to read CV."
        );
    }

    #[test]
    fn test_http_reason_without_message() {
        let err = ActionError::Http {
            status: 502,
            message: None,
        };
        assert_eq!(err.reason(), "Server returned 502");
    }

    #[test]
    fn test_malformed_reason_is_fixed_text() {
        assert_eq!(ActionError::MalformedResponse.reason(), "malformed response");
    }

    #[test]
    fn test_every_reason_is_non_empty() {
        let errors = [
            ActionError::Validation("endpoint must not be empty".to_string()),
            ActionError::Network("connection refused".to_string()),
            ActionError::Http {
                status: 500,
                message: None,
            },
            ActionError::MalformedResponse,
            ActionError::Application("LLM quota exceeded".to_string()),
        ];
        for err in errors {
            assert!(!err.reason().is_empty(), "{} produced empty reason", err.code());
        }
    }
}
