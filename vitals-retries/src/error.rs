//! Retry error types.

use crate::config::RetryCondition;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a single fetch attempt or by the retry loop itself.
#[derive(Debug, Error)]
pub enum RetryableError {
    /// Non-2xx HTTP response.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
        /// Retry-After hint sent by the server.
        retry_after: Option<Duration>,
    },

    /// The request timed out before any response arrived.
    #[error("Timeout")]
    Timeout,

    /// Connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A transient failure persisted past the retry budget.
    #[error("Retries exhausted after {attempts} attempts (last status: {last_status:?})")]
    Exhausted {
        /// Total attempts issued, including the first.
        attempts: u32,
        /// Status of the last response, `None` when the last attempt never got one.
        last_status: Option<u16>,
        /// Rendered last error.
        last_error: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RetryableError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    /// Create an HTTP error carrying a Retry-After hint.
    pub fn http_with_hint(status: u16, body: impl Into<String>, retry_after: Duration) -> Self {
        Self::Http {
            status,
            body: body.into(),
            retry_after: Some(retry_after),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Get the server supplied retry-after duration.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether this is a transport level failure (no HTTP response at all).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection(_))
    }

    /// Check if this error is retryable under the default [`RetryCondition`].
    pub fn is_retryable(&self) -> bool {
        RetryCondition::default().should_retry(self)
    }

    /// Get the HTTP status if one was observed.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Exhausted { last_status, .. } => *last_status,
            _ => None,
        }
    }
}

/// Result type for retry operations.
pub type RetryResult<T> = Result<T, RetryableError>;
