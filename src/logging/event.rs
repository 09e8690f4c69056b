//! Structured log events emitted by the pipeline.

use std::time::{Duration, SystemTime};

/// One log event.
///
/// Header and body fields are already gated by the logging switches and
/// sanitized/truncated for display; sinks render them as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// When the event was produced.
    pub timestamp: SystemTime,
    /// Caller-supplied label of the call.
    pub description: String,
    pub kind: EventKind,
}

/// Kind-specific event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// An attempt is about to be sent.
    Request {
        method: http::Method,
        url: String,
        /// Headers as a JSON object, `None` when header logging is off.
        headers: Option<String>,
        /// Request body, `None` when body logging is off.
        body: Option<String>,
    },
    /// An attempt received a response.
    Response {
        status: http::StatusCode,
        duration: Duration,
        /// Response body, `None` when body logging is off.
        body: Option<String>,
    },
    /// An attempt or the call failed.
    Error {
        message: String,
        /// Time spent in the failed attempt, if one was running.
        duration: Option<Duration>,
    },
    /// Progress information such as a scheduled retry.
    Info { message: String },
}

impl EventKind {
    /// Short name of the kind: `request`, `response`, `error`, or `info`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Response { .. } => "response",
            Self::Error { .. } => "error",
            Self::Info { .. } => "info",
        }
    }
}
