use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `invalid_request_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Caller-facing error envelope for this error
    fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code(), self.error_type(), self.client_message())
    }
}

/// Caller-dialect error body: `{ "error": { message, type, code } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Inner error object of an [`ErrorEnvelope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Machine-readable classification
    #[serde(rename = "type")]
    pub error_type: String,
    /// HTTP status code mirrored into the body
    pub code: u16,
}

impl ErrorEnvelope {
    /// Build an envelope for the given status, type and message
    pub fn new(status: StatusCode, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                error_type: error_type.into(),
                code: status.as_u16(),
            },
        }
    }
}
