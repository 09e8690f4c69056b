//! Error types for payload encoding.

use thiserror::Error;

/// Error raised while turning a payload into a request.
///
/// Neither variant is transient: retrying the same payload yields the
/// same failure.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as given by the caller
        url: String,
        /// Parser error message
        reason: String,
    },

    /// The payload could not be serialized.
    #[error("Failed to encode payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A query-string method received a payload that is not a flat object.
    #[error("{method} payload must be a JSON object to encode as query parameters")]
    QueryNotObject {
        /// The request method
        method: http::Method,
    },
}
