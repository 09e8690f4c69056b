//! Gatekeeper between the pipeline and a [`LogSink`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method, StatusCode};

use crate::config::LoggingConfig;
use crate::time::{Clock, SystemClock};

use super::format::{format_body, format_headers};
use super::{EventKind, LogEvent, LogSink, TracingSink};

/// Applies [`LoggingConfig`] to pipeline events before they reach the sink.
///
/// - Nothing is emitted when logging is disabled.
/// - Headers are included only with `log_headers`, masked with
///   `sanitize_headers`.
/// - Bodies are included only with `log_request_body`/`log_response_body`
///   and formatted by [`format_body`].
#[derive(Clone)]
pub struct RequestLogger {
    config: LoggingConfig,
    sink: Arc<dyn LogSink>,
    clock: Arc<dyn Clock>,
}

impl RequestLogger {
    /// Creates a logger that writes to [`TracingSink`].
    #[must_use]
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the clock used to stamp events.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the logging switches.
    #[must_use]
    pub const fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Logs an attempt about to be sent.
    pub fn request(
        &self,
        description: &str,
        method: &Method,
        url: &url::Url,
        headers: &HeaderMap,
        body: &str,
    ) {
        if !self.config.enabled {
            return;
        }

        let headers = self
            .config
            .log_headers
            .then(|| format_headers(headers, self.config.sanitize_headers));
        let body = self.config.log_request_body.then(|| format_body(body));

        self.emit(
            description,
            EventKind::Request {
                method: method.clone(),
                url: url.to_string(),
                headers,
                body,
            },
        );
    }

    /// Logs a received response.
    pub fn response(&self, description: &str, status: StatusCode, duration: Duration, body: &str) {
        if !self.config.enabled {
            return;
        }

        let body = self.config.log_response_body.then(|| format_body(body));
        self.emit(
            description,
            EventKind::Response {
                status,
                duration,
                body,
            },
        );
    }

    /// Logs a failure.
    pub fn error(&self, description: &str, message: &str, duration: Option<Duration>) {
        if !self.config.enabled {
            return;
        }

        self.emit(
            description,
            EventKind::Error {
                message: message.to_string(),
                duration,
            },
        );
    }

    /// Logs progress information.
    pub fn info(&self, description: &str, message: &str) {
        if !self.config.enabled {
            return;
        }

        self.emit(
            description,
            EventKind::Info {
                message: message.to_string(),
            },
        );
    }

    fn emit(&self, description: &str, kind: EventKind) {
        self.sink.emit(&LogEvent {
            timestamp: self.clock.now(),
            description: description.to_string(),
            kind,
        });
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
