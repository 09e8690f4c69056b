//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers validation of [`ClientConfig`](super::ClientConfig), TOML file
/// handling, and parsing of CLI request arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration that must be positive was zero.
    #[error("{field} must be greater than 0")]
    NonPositiveDuration {
        /// Name of the field
        field: &'static str,
    },

    /// A count that must not be negative was negative.
    #[error("{field} cannot be negative")]
    NegativeCount {
        /// Name of the field
        field: &'static str,
    },

    /// A count does not fit the target integer type.
    #[error("{field} is out of range: {value}")]
    CountOutOfRange {
        /// Name of the field
        field: &'static str,
        /// The offending value
        value: i64,
    },

    /// A retryable status code is not a valid HTTP status.
    #[error("Invalid retryable status code {0}")]
    InvalidStatusCode(i64),

    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid HTTP method.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// Invalid header format.
    #[error("Invalid header format '{value}': expected 'Key=Value' or 'Key: Value'")]
    InvalidHeader {
        /// The invalid header string
        value: String,
    },

    /// Invalid header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid query parameter format.
    #[error("Invalid query parameter '{value}': expected 'key=value'")]
    InvalidQuery {
        /// The invalid parameter string
        value: String,
    },

    /// The `--json` argument is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl ConfigError {
    /// Creates a `NonPositiveDuration` error.
    #[must_use]
    pub const fn non_positive(field: &'static str) -> Self {
        Self::NonPositiveDuration { field }
    }

    /// Creates a `NegativeCount` error.
    #[must_use]
    pub const fn negative(field: &'static str) -> Self {
        Self::NegativeCount { field }
    }
}
