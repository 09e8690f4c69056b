//! Error types for HTTP transport operations.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for a single HTTP round trip.
///
/// Describes what went wrong without dictating recovery strategy; the
/// retry policy decides which variants are worth another attempt.
///
/// Wrapped errors are rendered with their whole source chain.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes connection refused, resets, and aborted handshakes.
    #[error("Connection error: {}", chain(.0.as_ref()))]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TLS negotiation or certificate verification failed.
    ///
    /// Also covers a plain-HTTP server answering an `https` URL.
    #[error("TLS error: {}", chain(.0.as_ref()))]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The host name could not be resolved.
    #[error("DNS resolution failed: {}", chain(.0.as_ref()))]
    Resolve(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within a transport timeout.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be read to the end.
    #[error("Failed to read response body (unexpected EOF): {}", chain(.0.as_ref()))]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provided URL is invalid.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other request failure (redirect loop, malformed request, ...).
    #[error("Request failed: {}", chain(.0.as_ref()))]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    /// Returns true for failures that are typically transient.
    ///
    /// TLS and DNS failures are permanent.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout | Self::Body(_))
    }
}

/// Joins an error and its sources with `": "`.
fn chain(error: &(dyn std::error::Error + Send + Sync + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        // Some wrappers already embed their cause in their own message
        if !rendered.ends_with(&message) {
            rendered.push_str(": ");
            rendered.push_str(&message);
        }
        source = cause.source();
    }
    rendered
}

/// Error raised while building the transport from configuration.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    /// A PEM file could not be read.
    #[error("Failed to read {what} '{}': {source}", path.display())]
    ReadPem {
        /// What the file was supposed to contain
        what: &'static str,
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A PEM file did not contain usable TLS material.
    #[error("Invalid {what} in '{}': {source}", path.display())]
    InvalidPem {
        /// What the file was supposed to contain
        what: &'static str,
        /// Path to the file
        path: PathBuf,
        /// Parser error
        #[source]
        source: reqwest::Error,
    },

    /// Only one of certificate and key was configured.
    #[error("Client certificate and key must be configured together")]
    IncompleteIdentity,

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
