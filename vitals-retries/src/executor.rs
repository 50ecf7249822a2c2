//! Retry executor for running operations with retries.
//!
//! Attempts run strictly one after another: the next attempt is only issued
//! after the previous one has resolved and the computed delay has elapsed.

use crate::config::RetryConfig;
use crate::error::{RetryResult, RetryableError};
use crate::sleep::{Sleeper, TokioSleeper};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// State of a retry run.
#[derive(Debug, Clone, Default)]
pub struct RetryState {
    /// Current attempt number (1-indexed).
    pub attempt: u32,
    /// Last error message.
    pub last_error: Option<String>,
    /// Total time spent waiting.
    pub total_wait_time: Duration,
    /// History of attempts.
    pub history: Vec<AttemptInfo>,
}

impl RetryState {
    /// Delays that were scheduled after failed attempts, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.history
            .iter()
            .filter(|a| !a.success)
            .filter_map(|a| a.wait_after)
            .collect()
    }
}

/// Information about a single attempt.
#[derive(Debug, Clone)]
pub struct AttemptInfo {
    /// Attempt number.
    pub attempt: u32,
    /// Whether it succeeded.
    pub success: bool,
    /// Status observed, if any.
    pub status: Option<u16>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Time waited after this attempt before the next one.
    pub wait_after: Option<Duration>,
}

/// Execute an operation with retries, sleeping on the tokio timer.
///
/// # Example
///
/// ```ignore
/// use vitals_retries::{with_retry, RetryConfig};
///
/// let config = RetryConfig::default();
/// let result = with_retry(&config, || async {
///     Ok::<_, vitals_retries::RetryableError>("success")
/// }).await?;
/// ```
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> RetryResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = RetryResult<T>>,
{
    Retry::new(config).run(operation).await
}

/// Execute with retries and get state information.
pub async fn with_retry_state<F, Fut, T>(
    config: &RetryConfig,
    operation: F,
) -> (RetryResult<T>, RetryState)
where
    F: Fn() -> Fut,
    Fut: Future<Output = RetryResult<T>>,
{
    Retry::new(config).run_with_state(operation).await
}

/// Builder for retry operations.
pub struct Retry<'a> {
    config: &'a RetryConfig,
    sleeper: &'a dyn Sleeper,
    target: &'a str,
}

impl<'a> Retry<'a> {
    /// Create a new retry builder.
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            sleeper: &TokioSleeper,
            target: "operation",
        }
    }

    /// Use a custom sleeper between attempts.
    pub fn sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Label reported in retry diagnostics, usually the request URL.
    pub fn target(mut self, target: &'a str) -> Self {
        self.target = target;
        self
    }

    /// Run the operation with retries.
    pub async fn run<F, Fut, T>(self, operation: F) -> RetryResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = RetryResult<T>>,
    {
        self.run_with_state(operation).await.0
    }

    /// Run and get state.
    pub async fn run_with_state<F, Fut, T>(self, operation: F) -> (RetryResult<T>, RetryState)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = RetryResult<T>>,
    {
        let config = self.config;
        let mut state = RetryState::default();
        let max_attempts = config.max_attempts();

        loop {
            state.attempt += 1;

            debug!(
                target_url = self.target,
                attempt = state.attempt,
                max_attempts,
                "Executing attempt"
            );

            let error = match operation().await {
                Ok(result) => {
                    state.history.push(AttemptInfo {
                        attempt: state.attempt,
                        success: true,
                        status: None,
                        error: None,
                        wait_after: None,
                    });
                    return (Ok(result), state);
                }
                Err(error) => error,
            };

            let rendered = error.to_string();
            state.last_error = Some(rendered.clone());

            if !config.retry_on.should_retry(&error) {
                state.history.push(AttemptInfo {
                    attempt: state.attempt,
                    success: false,
                    status: error.status(),
                    error: Some(rendered),
                    wait_after: None,
                });
                warn!(
                    target_url = self.target,
                    attempt = state.attempt,
                    error = %error,
                    "Error not retryable"
                );
                return (Err(error), state);
            }

            if state.attempt >= max_attempts {
                state.history.push(AttemptInfo {
                    attempt: state.attempt,
                    success: false,
                    status: error.status(),
                    error: Some(rendered.clone()),
                    wait_after: None,
                });
                warn!(
                    target_url = self.target,
                    attempts = state.attempt,
                    error = %error,
                    "Retries exhausted"
                );
                let exhausted = RetryableError::Exhausted {
                    attempts: state.attempt,
                    last_status: error.status(),
                    last_error: rendered,
                };
                return (Err(exhausted), state);
            }

            let wait = config.delay_for(&error, state.attempt);
            state.total_wait_time = state.total_wait_time.saturating_add(wait);
            state.history.push(AttemptInfo {
                attempt: state.attempt,
                success: false,
                status: error.status(),
                error: Some(rendered),
                wait_after: Some(wait),
            });

            warn!(
                target_url = self.target,
                status = ?error.status(),
                attempt = state.attempt,
                delay_ms = wait.as_millis() as u64,
                "Transient failure, retrying"
            );

            self.sleeper.sleep(wait).await;
        }
    }
}
