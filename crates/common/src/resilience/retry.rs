//! Exponential retry policy.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a retry policy
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// The retry configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// How many times an operation may be retried and how long to wait before each
/// retry.
///
/// Delays double from the base delay: `2^attempt × base_delay`, capped at
/// `base_delay × 2^max_retries`. `attempt` is zero-based: the first retry
/// uses `backoff(0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Default number of retries after the initial attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Default base delay for exponential backoff.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

    /// Create a doubling policy.
    ///
    /// # Errors
    /// Returns [`RetryError::InvalidConfiguration`] when `base_delay` is zero.
    pub fn new(max_retries: u32, base_delay: Duration) -> Result<Self, RetryError> {
        if base_delay.is_zero() {
            return Err(RetryError::InvalidConfiguration {
                message: "base delay must be greater than 0".to_string(),
            });
        }
        Ok(Self::doubling(max_retries, base_delay))
    }

    fn doubling(max_retries: u32, base_delay: Duration) -> Self {
        let max_delay = base_delay.saturating_mul(1u32 << max_retries.min(16));
        Self { max_retries, base_delay, max_delay }
    }

    /// Maximum number of retries after the initial attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the retry with the given zero-based index
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }

    /// Whether another retry is allowed after `retries_so_far` retries
    pub fn should_retry(&self, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::doubling(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_BASE_DELAY)
    }
}
