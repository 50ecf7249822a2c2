//! Retry configuration.

use crate::error::RetryableError;
use rand::Rng;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Statuses that indicate a transient server or gateway condition.
pub const RETRYABLE_STATUSES: [u16; 4] = [429, 500, 502, 503];

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (total attempts is one more).
    pub max_retries: u32,
    /// Wait strategy.
    pub wait: WaitStrategy,
    /// Retry condition.
    pub retry_on: RetryCondition,
    /// Upper bound (exclusive) of the uniform jitter added to HTTP retries.
    pub jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            wait: WaitStrategy::RetryAfter {
                fallback: Box::new(WaitStrategy::ExponentialBackoff {
                    initial: Duration::from_secs(1),
                    max: Duration::from_secs(10),
                    multiplier: 2.0,
                }),
                max_wait: None,
            },
            retry_on: RetryCondition::default(),
            jitter: Duration::from_millis(300),
        }
    }
}

impl RetryConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the wait strategy.
    pub fn wait(mut self, strategy: WaitStrategy) -> Self {
        self.wait = strategy;
        self
    }

    /// Use exponential backoff, still honoring Retry-After hints.
    pub fn exponential(mut self, initial: Duration, max: Duration) -> Self {
        self.wait = WaitStrategy::RetryAfter {
            fallback: Box::new(WaitStrategy::ExponentialBackoff {
                initial,
                max,
                multiplier: 2.0,
            }),
            max_wait: None,
        };
        self
    }

    /// Use fixed delay, ignoring Retry-After hints.
    pub fn fixed(mut self, delay: Duration) -> Self {
        self.wait = WaitStrategy::Fixed(delay);
        self
    }

    /// Set the jitter bound.
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Disable jitter.
    pub fn without_jitter(self) -> Self {
        self.jitter(Duration::ZERO)
    }

    /// Set retry condition.
    pub fn retry_on(mut self, condition: RetryCondition) -> Self {
        self.retry_on = condition;
        self
    }

    /// Create config that never retries.
    pub fn no_retry() -> Self {
        Self::new().max_retries(0)
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Compute the delay before the retry following a failed `attempt` (1-indexed).
    ///
    /// HTTP failures get the hint (or backoff) plus jitter; transport failures
    /// have no hint and use the backoff alone.
    pub fn delay_for(&self, error: &RetryableError, attempt: u32) -> Duration {
        let base = self.wait.calculate(attempt, error.retry_after());
        if error.is_transport() {
            base
        } else {
            base.saturating_add(random_jitter(self.jitter))
        }
    }
}

/// Strategy for waiting between retries.
#[derive(Debug, Clone)]
pub enum WaitStrategy {
    /// No waiting.
    None,
    /// Fixed delay.
    Fixed(Duration),
    /// Exponential backoff.
    ExponentialBackoff {
        /// Initial delay.
        initial: Duration,
        /// Maximum delay.
        max: Duration,
        /// Multiplier for each attempt.
        multiplier: f64,
    },
    /// Respect the server's Retry-After hint.
    RetryAfter {
        /// Used when the response carries no hint.
        fallback: Box<WaitStrategy>,
        /// Optional cap on the hinted wait.
        max_wait: Option<Duration>,
    },
}

impl WaitStrategy {
    /// Calculate the wait duration for a given attempt (1-indexed).
    pub fn calculate(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match self {
            WaitStrategy::None => Duration::ZERO,
            WaitStrategy::Fixed(d) => *d,
            WaitStrategy::ExponentialBackoff {
                initial,
                max,
                multiplier,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let delay = initial.as_secs_f64() * multiplier.powi(exponent);
                Duration::try_from_secs_f64(delay.min(max.as_secs_f64())).unwrap_or(*max)
            }
            WaitStrategy::RetryAfter { fallback, max_wait } => match retry_after {
                Some(hint) => max_wait.map_or(hint, |cap| hint.min(cap)),
                None => fallback.calculate(attempt, None),
            },
        }
    }
}

/// Condition for retrying.
#[derive(Debug, Clone)]
pub struct RetryCondition {
    /// HTTP status codes to retry on.
    pub on_status_codes: Vec<u16>,
    /// Whether timeouts and connection failures are retried.
    pub on_transport_errors: bool,
}

impl Default for RetryCondition {
    fn default() -> Self {
        Self::new().on_status(RETRYABLE_STATUSES).on_transport_errors()
    }
}

impl RetryCondition {
    /// Create a condition that retries nothing.
    pub fn new() -> Self {
        Self {
            on_status_codes: Vec::new(),
            on_transport_errors: false,
        }
    }

    /// Add status codes to retry on.
    pub fn on_status(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.on_status_codes.extend(codes);
        self
    }

    /// Retry on rate limit (429).
    pub fn on_rate_limit(self) -> Self {
        self.on_status([429])
    }

    /// Retry on timeouts and connection failures.
    pub fn on_transport_errors(mut self) -> Self {
        self.on_transport_errors = true;
        self
    }

    /// Check if an error should be retried.
    pub fn should_retry(&self, error: &RetryableError) -> bool {
        match error {
            RetryableError::Http { status, .. } => self.on_status_codes.contains(status),
            RetryableError::Timeout | RetryableError::Connection(_) => self.on_transport_errors,
            RetryableError::Exhausted { .. } | RetryableError::Other(_) => false,
        }
    }
}

/// Uniform jitter in `[0, bound)`.
fn random_jitter(bound: Duration) -> Duration {
    let bound_ms = bound.as_millis() as u64;
    if bound_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..bound_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_attempts(), 6);
        assert_eq!(config.jitter, Duration::from_millis(300));
    }

    #[test]
    fn test_config_builder() {
        let config = RetryConfig::new()
            .max_retries(2)
            .fixed(Duration::from_secs(1))
            .without_jitter();

        assert_eq!(config.max_retries, 2);
        assert_eq!(config.jitter, Duration::ZERO);
    }

    #[rstest]
    #[case(1, 1_000)]
    #[case(2, 2_000)]
    #[case(3, 4_000)]
    #[case(4, 8_000)]
    #[case(5, 10_000)]
    #[case(12, 10_000)]
    fn test_default_backoff_schedule(#[case] attempt: u32, #[case] millis: u64) {
        let config = RetryConfig::default();
        assert_eq!(
            config.wait.calculate(attempt, None),
            Duration::from_millis(millis)
        );
    }

    #[test]
    fn test_wait_strategy_retry_after() {
        let config = RetryConfig::default();

        assert_eq!(
            config.wait.calculate(3, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        assert_eq!(config.wait.calculate(1, None), Duration::from_secs(1));
    }

    #[test]
    fn test_wait_strategy_retry_after_capped() {
        let strategy = WaitStrategy::RetryAfter {
            fallback: Box::new(WaitStrategy::None),
            max_wait: Some(Duration::from_secs(2)),
        };
        assert_eq!(
            strategy.calculate(1, Some(Duration::from_secs(30))),
            Duration::from_secs(2)
        );
        assert_eq!(strategy.calculate(1, None), Duration::ZERO);
    }

    #[test]
    fn test_http_delay_includes_jitter() {
        let config = RetryConfig::default();
        let error = RetryableError::http(503, "");
        for _ in 0..50 {
            let delay = config.delay_for(&error, 2);
            assert!(delay >= Duration::from_millis(2_000));
            assert!(delay < Duration::from_millis(2_300));
        }
    }

    #[test]
    fn test_transport_delay_is_pure_backoff() {
        let config = RetryConfig::default();
        let error = RetryableError::Timeout;
        assert_eq!(config.delay_for(&error, 3), Duration::from_secs(4));
    }

    #[test]
    fn test_huge_hint_saturates() {
        let config = RetryConfig::default();
        let error = RetryableError::http_with_hint(503, "", Duration::MAX);
        assert_eq!(config.delay_for(&error, 1), Duration::MAX);
    }

    #[test]
    fn test_retry_condition() {
        let condition = RetryCondition::default();

        assert!(condition.should_retry(&RetryableError::http(429, "")));
        assert!(condition.should_retry(&RetryableError::http(500, "")));
        assert!(condition.should_retry(&RetryableError::http(502, "")));
        assert!(condition.should_retry(&RetryableError::http(503, "")));
        assert!(condition.should_retry(&RetryableError::connection("reset")));
        assert!(!condition.should_retry(&RetryableError::http(404, "")));
        assert!(!condition.should_retry(&RetryableError::http(504, "")));
    }

    #[test]
    fn test_custom_condition() {
        let condition = RetryCondition::new().on_rate_limit();
        assert!(condition.should_retry(&RetryableError::http(429, "")));
        assert!(!condition.should_retry(&RetryableError::http(500, "")));
        assert!(!condition.should_retry(&RetryableError::Timeout));
    }
}
