//! Retry policy: how many attempts, how long between them, and which
//! failures deserve another try.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::defaults;

use super::CallError;

/// Fixed-delay retry behavior.
///
/// A call makes at most `max_retries + 1` attempts, waiting `retry_delay`
/// before each retry. There is no backoff; every wait is the same length.
///
/// # Defaults
///
/// - `max_retries`: 0 (no retries)
/// - `retry_delay`: 1 second
/// - `retry_on_status`: 500, 502, 503, 504
///
/// # Example
///
/// ```
/// use netcall::pipeline::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(3)
///     .with_retry_delay(Duration::from_millis(250))
///     .with_retry_on_status([429, 503]);
///
/// assert_eq!(policy.max_attempts(), 4);
/// assert!(policy.is_retryable_status(429));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Wait before each retry.
    pub retry_delay: Duration,

    /// Response status codes that trigger a retry.
    pub retry_on_status: BTreeSet<u16>,
}

impl RetryPolicy {
    /// Creates a policy with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            retry_delay: defaults::retry_delay(),
            retry_on_status: defaults::RETRY_ON_STATUS.into_iter().collect(),
        }
    }

    /// Sets the number of retries after the initial attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before each retry.
    ///
    /// Zero delay is supported but creates a tight retry loop.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Replaces the set of retryable status codes.
    #[must_use]
    pub fn with_retry_on_status(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retry_on_status = codes.into_iter().collect();
        self
    }

    /// Total attempts a call may make, including the initial one.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns true if `status` is in the retryable set.
    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Decides whether a failed attempt should be retried.
    ///
    /// - Non-2xx responses retry only when their status is in the set.
    /// - Connection failures, transport timeouts, and truncated bodies retry.
    /// - Invalid URLs, encoding failures, and other request errors do not.
    /// - Deadline expiry never retries.
    #[must_use]
    pub fn should_retry(&self, error: &CallError) -> bool {
        match error {
            CallError::Status { status, .. } => self.is_retryable_status(status.as_u16()),
            CallError::Transport(e) => e.is_transient(),
            CallError::InvalidUrl { .. } | CallError::Encoding(_) | CallError::Deadline { .. } => {
                false
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
