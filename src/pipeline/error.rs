//! Call-level error taxonomy.

use std::time::Duration;

use thiserror::Error;

use crate::payload::EncodeError;
use crate::transport::HttpError;

/// Why a call failed.
///
/// Each variant is produced where the failure happens, so the retry
/// decision matches on the variant instead of inspecting messages.
#[derive(Debug, Error)]
pub enum CallError {
    /// The URL could not be parsed. Never retried.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given by the caller
        url: String,
        /// Parser error message
        reason: String,
    },

    /// The payload could not be encoded. Never retried.
    #[error(transparent)]
    Encoding(EncodeError),

    /// The round trip failed at the network level.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The server answered with a non-2xx status.
    ///
    /// The message keeps the fixed phrase
    /// `received non-2xx response code: <code>`.
    #[error("received non-2xx response code: {}", status.as_u16())]
    Status {
        /// The response status
        status: http::StatusCode,
        /// The response body as text
        body: String,
    },

    /// The call's shared deadline expired. Never retried.
    #[error("Request deadline of {}ms exceeded", timeout.as_millis())]
    Deadline {
        /// The base timeout that was exhausted
        timeout: Duration,
    },
}

impl CallError {
    /// Returns the response body carried by a non-2xx failure.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the response status of a non-2xx failure.
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the call ran out of time.
    #[must_use]
    pub const fn is_deadline(&self) -> bool {
        matches!(self, Self::Deadline { .. })
    }
}

impl From<EncodeError> for CallError {
    fn from(error: EncodeError) -> Self {
        match error {
            EncodeError::InvalidUrl { url, reason } => Self::InvalidUrl { url, reason },
            other => Self::Encoding(other),
        }
    }
}
