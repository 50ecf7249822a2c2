//! Client errors.

use thiserror::Error;
use vitals_retries::RetryableError;

/// Errors that abort a retrieval or submission run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A request failed terminally or ran out of retries.
    #[error(transparent)]
    Fetch(#[from] RetryableError),

    /// A 2xx page body did not have the expected shape.
    #[error("Malformed response for page {page}: {reason}")]
    MalformedEnvelope {
        /// Page number requested.
        page: u32,
        /// What was wrong.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed-envelope error.
    pub fn malformed(page: u32, reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            page,
            reason: reason.into(),
        }
    }

    /// Whether the server answered 2xx with an unusable body.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MalformedEnvelope { .. })
    }

    /// Whether the retry budget ran out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Fetch(RetryableError::Exhausted { .. }))
    }

    /// HTTP status behind the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
