//! TOML configuration file parsing.
//!
//! Every section is optional. A section that is present replaces the whole
//! corresponding sub-structure of [`ClientConfig`]; keys omitted inside it
//! fall back to the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::pipeline::RetryPolicy;

use super::ConfigError;
use super::defaults;
use super::settings::{ClientConfig, ConnectionConfig, LoggingConfig, TimeoutConfig, TlsConfig};

/// Root configuration structure from TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub client: ClientSection,

    pub tls: Option<TlsSection>,

    pub timeouts: Option<TimeoutsSection>,

    pub connection: Option<ConnectionSection>,

    pub retry: Option<RetrySection>,

    pub logging: Option<LoggingSection>,
}

/// Top-level client settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base timeout for a whole call in milliseconds
    pub timeout_ms: Option<u64>,
}

/// TLS settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsSection {
    pub verify_peer: Option<bool>,
    pub ca_path: Option<PathBuf>,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

/// Transport timeouts, all in milliseconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsSection {
    pub dial_ms: Option<u64>,
    pub tls_handshake_ms: Option<u64>,
    pub response_header_ms: Option<u64>,
    pub idle_ms: Option<u64>,
    pub expect_continue_ms: Option<u64>,
}

/// Connection pool limits.
///
/// Signed so that negative values are reported as validation errors
/// rather than parse errors.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSection {
    pub max_idle: Option<i64>,
    pub max_idle_per_host: Option<i64>,
    pub max_per_host: Option<i64>,
}

/// Retry settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    pub max_retries: Option<i64>,
    pub delay_ms: Option<u64>,
    pub on_status: Option<Vec<i64>>,
}

/// Logging switches.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub enabled: Option<bool>,
    pub request_body: Option<bool>,
    pub response_body: Option<bool>,
    pub headers: Option<bool>,
    pub sanitize_headers: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Converts the file contents into a [`ClientConfig`].
    ///
    /// The result is not yet validated; call [`ClientConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if a count is negative or out of range, or a
    /// retryable status code is not a valid HTTP status. When a count is
    /// rejected, a zero base, dial, or TLS handshake timeout is reported
    /// first.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.to_client_config_with_timeout(None)
    }

    /// Like [`to_client_config`](Self::to_client_config), with the base
    /// timeout taken from `base_timeout` when given.
    ///
    /// # Errors
    ///
    /// Same as [`to_client_config`](Self::to_client_config).
    pub fn to_client_config_with_timeout(
        &self,
        base_timeout: Option<Duration>,
    ) -> Result<ClientConfig, ConfigError> {
        let base_timeout = base_timeout
            .or_else(|| self.client.timeout_ms.map(Duration::from_millis))
            .unwrap_or_else(defaults::shared_base_timeout);

        let mut config = ClientConfig::new(base_timeout);

        if let Some(tls) = &self.tls {
            config = config.with_tls(tls.to_tls_config());
        }
        if let Some(timeouts) = &self.timeouts {
            config = config.with_timeouts(timeouts.to_timeout_config());
        }
        if let Some(logging) = &self.logging {
            config = config.with_logging(logging.to_logging_config());
        }

        let connection = self
            .connection
            .as_ref()
            .map(ConnectionSection::to_connection_config)
            .transpose();
        let retry = self
            .retry
            .as_ref()
            .map(RetrySection::to_retry_policy)
            .transpose();

        // Duration rules precede count rules
        if connection.is_err() || retry.is_err() {
            config.validate()?;
        }

        if let Some(connection) = connection? {
            config = config.with_connection(connection);
        }
        if let Some(retry) = retry? {
            config = config.with_retry(retry);
        }

        Ok(config)
    }
}

impl TlsSection {
    fn to_tls_config(&self) -> TlsConfig {
        let base = TlsConfig::default();
        TlsConfig {
            verify_peer: self.verify_peer.unwrap_or(base.verify_peer),
            ca_path: self.ca_path.clone(),
            cert_path: self.cert_path.clone(),
            key_path: self.key_path.clone(),
        }
    }
}

impl TimeoutsSection {
    fn to_timeout_config(&self) -> TimeoutConfig {
        let base = TimeoutConfig::default();
        let pick = |ms: Option<u64>, fallback: Duration| ms.map_or(fallback, Duration::from_millis);

        TimeoutConfig {
            dial: pick(self.dial_ms, base.dial),
            tls_handshake: pick(self.tls_handshake_ms, base.tls_handshake),
            response_header: pick(self.response_header_ms, base.response_header),
            idle: pick(self.idle_ms, base.idle),
            expect_continue: pick(self.expect_continue_ms, base.expect_continue),
        }
    }
}

impl ConnectionSection {
    fn to_connection_config(&self) -> Result<ConnectionConfig, ConfigError> {
        let base = ConnectionConfig::default();

        Ok(ConnectionConfig {
            max_idle: count(self.max_idle, "maxIdleConns")?.unwrap_or(base.max_idle),
            max_idle_per_host: count(self.max_idle_per_host, "maxIdleConnsPerHost")?
                .unwrap_or(base.max_idle_per_host),
            // Zero or below means no limit
            max_per_host: self.max_per_host.map_or(base.max_per_host, |value| {
                usize::try_from(value.max(0)).unwrap_or(usize::MAX)
            }),
        })
    }
}

impl RetrySection {
    fn to_retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let mut policy = RetryPolicy::new();

        if let Some(max_retries) = count::<u32>(self.max_retries, "maxRetries")? {
            policy = policy.with_max_retries(max_retries);
        }
        if let Some(ms) = self.delay_ms {
            policy = policy.with_retry_delay(Duration::from_millis(ms));
        }
        if let Some(codes) = &self.on_status {
            let codes = codes
                .iter()
                .map(|&code| {
                    u16::try_from(code)
                        .ok()
                        .filter(|c| (100..=999).contains(c))
                        .ok_or(ConfigError::InvalidStatusCode(code))
                })
                .collect::<Result<Vec<_>, _>>()?;
            policy = policy.with_retry_on_status(codes);
        }

        Ok(policy)
    }
}

impl LoggingSection {
    fn to_logging_config(&self) -> LoggingConfig {
        let base = LoggingConfig::default();
        LoggingConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            log_request_body: self.request_body.unwrap_or(base.log_request_body),
            log_response_body: self.response_body.unwrap_or(base.log_response_body),
            log_headers: self.headers.unwrap_or(base.log_headers),
            sanitize_headers: self.sanitize_headers.unwrap_or(base.sanitize_headers),
        }
    }
}

/// Converts an optional signed count, rejecting negative values.
fn count<T: TryFrom<i64>>(value: Option<i64>, field: &'static str) -> Result<Option<T>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value < 0 {
        return Err(ConfigError::negative(field));
    }
    T::try_from(value)
        .map(Some)
        .map_err(|_| ConfigError::CountOutOfRange { field, value })
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netcall configuration file

[client]
# Budget for one whole call, shared by all retry attempts (milliseconds)
timeout_ms = 30000

[tls]
# Verify server certificates (disable only for testing)
verify_peer = true
# Extra PEM root certificate to trust
# ca_path = "/etc/ssl/private-ca.pem"
# PEM client certificate and key for mutual TLS
# cert_path = "client.pem"
# key_path = "client.key"

[timeouts]
dial_ms = 5000
tls_handshake_ms = 10000
response_header_ms = 10000
idle_ms = 90000
expect_continue_ms = 1000

[connection]
max_idle = 100
max_idle_per_host = 10
# 0 = unlimited
max_per_host = 0

[retry]
# Retries after the initial attempt (0 = no retries)
max_retries = 0
delay_ms = 1000
on_status = [500, 502, 503, 504]

[logging]
enabled = true
request_body = true
response_body = true
headers = true
# Mask Authorization, tokens and API keys in logs
sanitize_headers = true
"#
    .to_string()
}
