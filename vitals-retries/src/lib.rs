//! # vitals-retries
//!
//! Resilient request execution for the vitals pipeline.
//!
//! A logical request is retried on transient failure until it succeeds, hits
//! a non-retryable status, or runs out of retry budget.
//!
//! ## Core Concepts
//!
//! - **[`RetryConfig`]**: retry budget, wait strategy, jitter
//! - **[`WaitStrategy`]**: how long to wait between retries
//! - **[`RetryCondition`]**: which failures are transient
//! - **[`Retry`]** / **[`with_retry`]**: the bounded attempt loop
//! - **[`Transport`]**: the black-box HTTP request/response function
//! - **[`RetryClient`]**: transport plus retries
//!
//! ## Defaults
//!
//! Statuses 429, 500, 502 and 503 and transport failures are transient.
//! Five retries (six attempts). The delay after attempt `n` is the server's
//! Retry-After hint when present, otherwise `min(1s * 2^(n-1), 10s)`; HTTP
//! failures add a uniform jitter in `[0, 300ms)`.
//!
//! ## Example
//!
//! ```ignore
//! use vitals_retries::{RetryClient, RetryConfig};
//!
//! let client = RetryClient::new(RetryConfig::default());
//! let response = client
//!     .get("https://api.example.com/patients?page=1&limit=10", &[("x-api-key", key)])
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod executor;
pub mod mock;
pub mod sleep;
pub mod transport;

// Re-exports
pub use config::{RetryCondition, RetryConfig, WaitStrategy, DEFAULT_MAX_RETRIES, RETRYABLE_STATUSES};
pub use error::{RetryResult, RetryableError};
pub use executor::{with_retry, with_retry_state, AttemptInfo, Retry, RetryState};
pub use sleep::{Sleeper, TokioSleeper};
pub use transport::{
    check_response, parse_retry_after, HttpRequest, HttpResponse, ReqwestTransport, RetryClient,
    Transport,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        with_retry, HttpRequest, HttpResponse, Retry, RetryClient, RetryConfig, RetryResult,
        RetryableError, Sleeper, Transport, WaitStrategy,
    };
}
