//! HTTP response types shared across channels
//!
//! `ErrorResponse` is the structured error body every handler returns;
//! `RelayedResponse` carries a provider reply back to the caller.

use axum::body::Bytes;
use axum::http::header::{HeaderMap, HeaderName, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Structured error response: `{"message": ...}` plus a status code.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    status: StatusCode,
    message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Headers a relayed provider response may keep: `content-type` and the
/// provider's own `x-` headers. Everything else (rate-limit, connection
/// management, internal headers) is stripped.
fn is_relayable(name: &HeaderName) -> bool {
    name == CONTENT_TYPE || name.as_str().starts_with("x-")
}

/// A provider reply relayed to the caller verbatim.
///
/// Status code and body are preserved byte-for-byte; headers are filtered
/// through the allow-list. The status is deliberately not interpreted:
/// a non-2xx provider reply is the caller's to classify.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RelayedResponse {
    /// Build a relayed response, applying the header allow-list.
    pub fn new(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        let mut kept = HeaderMap::new();
        for (name, value) in headers {
            if is_relayable(name) {
                kept.append(name.clone(), value.clone());
            }
        }

        Self {
            status,
            headers: kept,
            body,
        }
    }
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}
