//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Base timeout used when the shared client is created implicitly.
pub const SHARED_BASE_TIMEOUT_SECS: u64 = 30;

/// Default TCP dial timeout in milliseconds.
pub const DIAL_TIMEOUT_MS: u64 = 5_000;

/// Default TLS handshake timeout in milliseconds.
pub const TLS_HANDSHAKE_TIMEOUT_MS: u64 = 10_000;

/// Default response header timeout in milliseconds.
pub const RESPONSE_HEADER_TIMEOUT_MS: u64 = 10_000;

/// Default idle connection timeout in milliseconds.
pub const IDLE_CONN_TIMEOUT_MS: u64 = 90_000;

/// Default expect-continue timeout in milliseconds.
pub const EXPECT_CONTINUE_TIMEOUT_MS: u64 = 1_000;

/// Default cap on idle connections across all hosts.
pub const MAX_IDLE_CONNS: usize = 100;

/// Default cap on idle connections per host.
pub const MAX_IDLE_CONNS_PER_HOST: usize = 10;

/// Default cap on connections per host (0 = unlimited).
pub const MAX_CONNS_PER_HOST: usize = 0;

/// Default number of retries after the initial attempt.
pub const MAX_RETRIES: u32 = 0;

/// Default delay between attempts in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1_000;

/// Status codes retried by default (server errors).
pub const RETRY_ON_STATUS: [u16; 4] = [500, 502, 503, 504];

/// Base timeout of the implicitly created shared client.
#[must_use]
pub const fn shared_base_timeout() -> Duration {
    Duration::from_secs(SHARED_BASE_TIMEOUT_SECS)
}

/// Default delay between attempts as Duration.
#[must_use]
pub const fn retry_delay() -> Duration {
    Duration::from_millis(RETRY_DELAY_MS)
}
