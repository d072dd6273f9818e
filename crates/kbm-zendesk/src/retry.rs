//! Bounded retry policy for rate-limited and transient failures.

use std::time::Duration;

use kbm_config::HttpConfig;

/// Upper bound for computed delays.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Upper bound for server-requested (`Retry-After`) delays.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// How often and how long to wait before re-sending a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Build a policy from HTTP settings.
    #[must_use]
    pub fn from_config(http: &HttpConfig) -> Self {
        Self {
            max_retries: http.max_retries,
            base_delay: Duration::from_millis(http.retry_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    ///
    /// A `Retry-After` value from the server takes precedence over the
    /// exponential schedule, up to five minutes.
    #[must_use]
    pub fn delay(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(secs) = retry_after {
            return Duration::from_secs(secs).min(MAX_RETRY_AFTER);
        }
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}
