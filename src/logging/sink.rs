//! Log sinks: where events end up.

use tracing::{error, info, warn};

use super::{EventKind, LogEvent};

/// Renders log events.
///
/// The pipeline only produces [`LogEvent`]s; presentation (plain text,
/// color, JSON, ...) is entirely up to the sink.
pub trait LogSink: Send + Sync {
    /// Renders one event.
    fn emit(&self, event: &LogEvent);
}

/// Sink that forwards events to `tracing` as structured records.
///
/// Request, response, and info events are logged at INFO; responses with
/// a non-2xx status at WARN; errors at ERROR. Formatting and color are
/// left to the installed subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, event: &LogEvent) {
        let description = event.description.as_str();

        match &event.kind {
            EventKind::Request {
                method,
                url,
                headers,
                body,
            } => info!(
                description,
                %method,
                url = url.as_str(),
                headers = headers.as_deref(),
                payload = body.as_deref(),
                "outgoing-request"
            ),
            EventKind::Response {
                status,
                duration,
                body,
            } => {
                let duration_ms = millis(*duration);
                let status = status.as_u16();
                if (200..300).contains(&status) {
                    info!(
                        description,
                        status,
                        duration_ms,
                        response = body.as_deref(),
                        "incoming-response"
                    );
                } else {
                    warn!(
                        description,
                        status,
                        duration_ms,
                        response = body.as_deref(),
                        "incoming-response"
                    );
                }
            }
            EventKind::Error { message, duration } => error!(
                description,
                error = message.as_str(),
                duration_ms = duration.map(millis),
                "request-error"
            ),
            EventKind::Info { message } => info!(description, "{message}"),
        }
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
