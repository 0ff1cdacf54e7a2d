//! Turns a settled HTTP exchange into either the produced value or an
//! `ActionError`. Pure, so every response shape is covered by unit tests.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::ActionError;
use crate::transport::TransportResponse;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Normalizes `response`, reading the success value from `result_field`.
///
/// Order:
/// 1. non-2xx → `Http { status, message }` (message from an `{ "error": .. }` body)
/// 2. body not a JSON object → `MalformedResponse`
/// 3. `result_field` is a non-empty string → value
/// 4. `error` is a non-empty string → `Application`
/// 5. otherwise → `MalformedResponse`
pub fn normalize(response: &TransportResponse, result_field: &str) -> Result<String, ActionError> {
    if !(200..300).contains(&response.status) {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .map(|b| b.error.trim().to_string())
            .filter(|m| !m.is_empty());
        return Err(ActionError::Http {
            status: response.status,
            message,
        });
    }

    let object: Map<String, Value> = match serde_json::from_str(&response.body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(ActionError::MalformedResponse),
    };

    if let Some(value) = non_empty_str(&object, result_field) {
        return Ok(value.to_string());
    }

    match non_empty_str(&object, "error") {
        Some(message) => Err(ActionError::Application(message.to_string())),
        None => Err(ActionError::MalformedResponse),
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
