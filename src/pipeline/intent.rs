//! Description of one call.

use http::{HeaderMap, Method};

use crate::payload::Payload;

/// Everything needed to perform one call.
///
/// Consumed by [`Pipeline::execute`](super::Pipeline::execute); nothing
/// from it outlives the call.
#[derive(Debug, Clone)]
pub struct RequestIntent {
    pub method: Method,
    /// Human-readable label used in log events.
    pub description: String,
    pub url: String,
    pub payload: Payload,
    /// Sent as-is; repeated names are all sent.
    pub headers: HeaderMap,
}

impl RequestIntent {
    /// Creates an intent with no payload and no headers.
    pub fn new(method: Method, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method,
            description: description.into(),
            url: url.into(),
            payload: Payload::Empty,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}
