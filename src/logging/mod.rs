//! Request/response logging.
//!
//! The pipeline reports what happens through a [`RequestLogger`], which
//! applies the [`LoggingConfig`](crate::config::LoggingConfig) switches and
//! display rules and hands structured [`LogEvent`]s to a [`LogSink`].
//! [`TracingSink`] is the default sink.

mod event;
mod format;
mod logger;
mod sink;


pub use event::{EventKind, LogEvent};
pub use format::{
    MASK_PREFIX_CHARS, MASKED_PLACEHOLDER, MAX_LOGGED_BODY_CHARS, SENSITIVE_HEADER_TERMS,
    format_body, format_headers, is_sensitive_header, sanitize_header_value,
};
pub use logger::RequestLogger;
pub use sink::{LogSink, TracingSink};
