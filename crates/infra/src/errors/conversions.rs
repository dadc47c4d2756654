//! Conversions from external infrastructure errors into domain errors.

use docpulse_domain::DocPulseError;
use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;

use crate::http::is_throttled;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DocPulseError);

impl From<InfraError> for DocPulseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DocPulseError> for InfraError {
    fn from(value: DocPulseError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDocPulseError {
    fn into_docpulse(self) -> DocPulseError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → DocPulseError */
/* -------------------------------------------------------------------------- */

/// Map a non-success provider response to a domain error.
///
/// `context` names the call (e.g. `"files.list"`); `body` is the response
/// text, trimmed into the message when present.
pub fn status_error(status: StatusCode, context: &str, body: &str) -> DocPulseError {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let detail = body.trim();
    let message = if detail.is_empty() {
        format!("{context}: HTTP {code} {reason}")
    } else {
        format!("{context}: HTTP {code} {reason}: {}", truncate(detail, 200))
    };

    if is_throttled(status, detail) {
        return DocPulseError::Network(message);
    }

    match code {
        401 | 403 => DocPulseError::Auth(message),
        404 => DocPulseError::NotFound(message),
        400..=499 => DocPulseError::InvalidInput(message),
        _ => DocPulseError::Network(message),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DocPulseError */
/* -------------------------------------------------------------------------- */

impl IntoDocPulseError for HttpError {
    fn into_docpulse(self) -> DocPulseError {
        if self.is_timeout() {
            return DocPulseError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DocPulseError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, "HTTP", "");
        }

        if self.is_decode() {
            return DocPulseError::Provider(format!("undecodable HTTP response: {self}"));
        }

        DocPulseError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_docpulse())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → DocPulseError */
/* -------------------------------------------------------------------------- */

impl IntoDocPulseError for JsonError {
    fn into_docpulse(self) -> DocPulseError {
        DocPulseError::Provider(format!(
            "malformed provider response at line {} column {}: {}",
            self.line(),
            self.column(),
            self
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_docpulse())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
