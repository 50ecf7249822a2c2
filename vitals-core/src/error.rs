//! Error types for vitals-core.
//!
//! Malformed clinical values are never errors at the classifier level; they
//! surface as [`Reading::Malformed`](crate::reading::Reading::Malformed).
//! These errors only appear when callers parse or serialize explicitly.

use thiserror::Error;

/// Errors from explicit parsing and report serialization.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Blood pressure text is not `<systolic>/<diastolic>`.
    #[error("Invalid blood pressure '{0}'")]
    InvalidBloodPressure(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
