//! Turns whatever the transport observed into a single envelope value.
//!
//! A 2xx answer is handed back exactly as the backend sent it (the backend
//! already wraps its payload in `{ ok, datos, mensaje }`). Everything else
//! becomes `{ "ok": false, "datos": null, "mensaje": ... }` where the message
//! is, in order of preference:
//!
//! 1. the `mensaje` the backend put in the error body,
//! 2. `"Error: <status> <status text>"` when a status was received,
//! 3. [`NO_RESPONSE_MESSAGE`] when the request went out but nothing came back,
//! 4. the transport's own error message.

use crate::domain::ports::TransportOutcome;
use serde_json::{json, Value};

pub const NO_RESPONSE_MESSAGE: &str = "No response from the server. Check your connection.";
pub const REQUEST_FAILED_MESSAGE: &str = "The request could not be made";

pub fn failure_envelope(message: &str) -> Value {
    json!({ "ok": false, "datos": null, "mensaje": message })
}

pub fn normalize(outcome: TransportOutcome) -> Value {
    match outcome {
        TransportOutcome::Response { status, body, .. } if (200..300).contains(&status) => {
            success_body(&body)
        }
        TransportOutcome::Response {
            url,
            status,
            status_text,
            body,
        } => {
            log_status(&url, status);
            failure_envelope(&status_message(status, &status_text, &body))
        }
        TransportOutcome::NoResponse { url, reason } => {
            tracing::error!("No response from server: {} ({})", url, reason);
            failure_envelope(NO_RESPONSE_MESSAGE)
        }
        TransportOutcome::RequestFailed { url, reason } => {
            tracing::error!("Request error: {} ({})", url, reason);
            if reason.trim().is_empty() {
                failure_envelope(REQUEST_FAILED_MESSAGE)
            } else {
                failure_envelope(&reason)
            }
        }
    }
}

fn success_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        // 204 and friends: nothing to pass through, but the call did succeed.
        return json!({ "ok": true, "datos": null, "mensaje": null });
    }

    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Malformed response body: {}", e);
            failure_envelope(&format!("Malformed response body: {}", e))
        }
    }
}

fn status_message(status: u16, status_text: &str, body: &[u8]) -> String {
    backend_message(body)
        .unwrap_or_else(|| format!("Error: {} {}", status, status_text).trim_end().to_string())
}

fn backend_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("mensaje")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn log_status(url: &str, status: u16) {
    match status {
        404 => tracing::warn!("Resource not found: {}", url),
        400 => tracing::warn!("Invalid request: {}", url),
        s if s >= 500 => tracing::error!("Server error: {} - Status: {}", url, s),
        s => tracing::debug!("Request to {} failed with status {}", url, s),
    }
}
