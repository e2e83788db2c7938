use http::StatusCode;
use tessera_core::HttpError;
use thiserror::Error;

/// Fallback message when nothing more specific is known about a failure
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Errors that can occur while proxying a chat completion
#[derive(Debug, Error)]
pub enum LlmError {
    /// Deployment is missing something a request needs (e.g. upstream credential)
    #[error("{0}")]
    Configuration(String),

    /// Client sent a malformed or invalid request
    #[error("{0}")]
    InvalidRequest(String),

    /// Upstream call failed at the transport level or returned a non-2xx status
    #[error("{message}")]
    Upstream {
        /// Upstream HTTP status, when a response was received
        status: Option<StatusCode>,
        /// Most specific message available
        message: String,
    },

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Error for a request that arrives while no upstream credential is configured
    pub fn missing_credential() -> Self {
        Self::Configuration("upstream API key is not configured".to_owned())
    }
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => GENERIC_ERROR_MESSAGE.to_owned(),
            Self::Upstream { message, .. } if message.trim().is_empty() => GENERIC_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }
}
