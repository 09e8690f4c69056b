//! Client configuration bundle.
//!
//! [`ClientConfig`] groups every knob of the client: the base timeout that
//! bounds each call, TLS policy, transport timeouts, connection pooling,
//! retry behavior, and logging. It is built once, validated, and then
//! handed to [`Client::new`](crate::Client::new), after which it is frozen.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::RetryPolicy;

use super::defaults;
use super::error::ConfigError;

/// TLS policy for outbound connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Verify the server certificate chain and hostname.
    pub verify_peer: bool,
    /// Additional PEM root certificate to trust.
    pub ca_path: Option<PathBuf>,
    /// PEM client certificate for mutual TLS.
    pub cert_path: Option<PathBuf>,
    /// PEM private key matching `cert_path`.
    pub key_path: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_peer: true,
            ca_path: None,
            cert_path: None,
            key_path: None,
        }
    }
}

/// Transport-level timeouts.
///
/// A zero `response_header`, `idle`, or `expect_continue` timeout means
/// "no limit"; `dial` and `tls_handshake` must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub dial: Duration,
    pub tls_handshake: Duration,
    pub response_header: Duration,
    pub idle: Duration,
    pub expect_continue: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            dial: Duration::from_millis(defaults::DIAL_TIMEOUT_MS),
            tls_handshake: Duration::from_millis(defaults::TLS_HANDSHAKE_TIMEOUT_MS),
            response_header: Duration::from_millis(defaults::RESPONSE_HEADER_TIMEOUT_MS),
            idle: Duration::from_millis(defaults::IDLE_CONN_TIMEOUT_MS),
            expect_continue: Duration::from_millis(defaults::EXPECT_CONTINUE_TIMEOUT_MS),
        }
    }
}

/// Connection pool limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Idle connections kept across all hosts.
    pub max_idle: usize,
    /// Idle connections kept per host.
    pub max_idle_per_host: usize,
    /// Concurrent connections per host; 0 means unlimited.
    pub max_per_host: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_idle: defaults::MAX_IDLE_CONNS,
            max_idle_per_host: defaults::MAX_IDLE_CONNS_PER_HOST,
            max_per_host: defaults::MAX_CONNS_PER_HOST,
        }
    }
}

/// Request/response logging switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // independent on/off switches
pub struct LoggingConfig {
    /// Master switch; when false nothing is logged.
    pub enabled: bool,
    pub log_request_body: bool,
    pub log_response_body: bool,
    pub log_headers: bool,
    /// Mask values of sensitive headers before logging.
    pub sanitize_headers: bool,
}

impl LoggingConfig {
    /// Logging turned off entirely.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            log_request_body: false,
            log_response_body: false,
            log_headers: false,
            sanitize_headers: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_request_body: true,
            log_response_body: true,
            log_headers: true,
            sanitize_headers: true,
        }
    }
}

/// Complete client configuration.
///
/// # Example
///
/// ```
/// use netcall::config::{ClientConfig, ConnectionConfig};
/// use netcall::pipeline::RetryPolicy;
/// use std::time::Duration;
///
/// let config = ClientConfig::new(Duration::from_secs(10))
///     .with_connection(ConnectionConfig {
///         max_idle: 50,
///         max_idle_per_host: 5,
///         max_per_host: 20,
///     })
///     .with_retry(RetryPolicy::new().with_max_retries(2));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Budget for one whole call, shared by all of its attempts.
    pub base_timeout: Duration,
    pub tls: TlsConfig,
    pub timeouts: TimeoutConfig,
    pub connection: ConnectionConfig,
    pub retry: RetryPolicy,
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Creates a configuration with the given base timeout and defaults
    /// for everything else.
    ///
    /// A zero `base_timeout` is accepted here and rejected by
    /// [`validate`](Self::validate).
    #[must_use]
    pub fn new(base_timeout: Duration) -> Self {
        Self {
            base_timeout,
            tls: TlsConfig::default(),
            timeouts: TimeoutConfig::default(),
            connection: ConnectionConfig::default(),
            retry: RetryPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Replaces the TLS policy.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Replaces the transport timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Replaces the connection pool limits.
    #[must_use]
    pub const fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the logging switches.
    #[must_use]
    pub const fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Disables server certificate verification.
    #[must_use]
    pub const fn with_insecure_tls(mut self) -> Self {
        self.tls.verify_peer = false;
        self
    }

    /// Checks the configuration, returning the first violated rule.
    ///
    /// Pool sizes and the retry count are unsigned, so the "cannot be
    /// negative" rules are enforced where signed input is parsed (see
    /// [`TomlConfig`](super::TomlConfig)).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveDuration`] if the base timeout,
    /// dial timeout, or TLS handshake timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_timeout.is_zero() {
            return Err(ConfigError::non_positive("baseTimeout"));
        }
        if self.timeouts.dial.is_zero() {
            return Err(ConfigError::non_positive("dialTimeout"));
        }
        if self.timeouts.tls_handshake.is_zero() {
            return Err(ConfigError::non_positive("tlsHandshakeTimeout"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(defaults::shared_base_timeout())
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClientConfig {{ timeout: {}ms, verify_peer: {}, pool: {}/{}/{}, retry: {}x/{}ms, logging: {} }}",
            self.base_timeout.as_millis(),
            self.tls.verify_peer,
            self.connection.max_idle,
            self.connection.max_idle_per_host,
            self.connection.max_per_host,
            self.retry.max_retries,
            self.retry.retry_delay.as_millis(),
            self.logging.enabled,
        )
    }
}
