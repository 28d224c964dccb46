//! Error types for the Touchwood client.
//!
//! # Design
//! Four failure categories are kept apart so callers can branch on them:
//! invalid arguments caught before any I/O, transport failures where no
//! response arrived, bodies that are not UTF-8 JSON, and API errors where
//! the service answered with a status of 400 or above.

use std::fmt;

use serde_json::Value;

use crate::http::TransportError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = TouchwoodError> = std::result::Result<T, E>;

/// Errors returned by `TouchwoodClient` and the endpoint traits.
#[derive(Debug, thiserror::Error)]
pub enum TouchwoodError {
    /// A required identifier or constructor argument was missing or empty.
    /// Raised locally, before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not complete at the network layer.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The response body was not valid UTF-8 JSON.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The service answered with a status code of 400 or above.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl TouchwoodError {
    /// The API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            TouchwoodError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(ApiError::status)
    }
}

/// Response body decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A non-success answer from the Touchwood service.
///
/// Carries the status code and the decoded error body. The service reports
/// errors as `{"code": .., "message": ..}`, but the body is kept verbatim
/// so other shapes survive too.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: u16,
    body: Value,
}

impl ApiError {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// The `message` field of the error body, if any.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// The `code` field of the error body, rendered as text.
    pub fn code(&self) -> Option<String> {
        match self.body.get("code")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code().unwrap_or_else(|| self.status.to_string());
        match self.message() {
            Some(message) => write!(f, "Touchwood API returned error code {code} ({message})"),
            None => write!(f, "Touchwood API returned error code {code} ({})", self.body),
        }
    }
}

impl std::error::Error for ApiError {}
