//! Display rules for logged headers and bodies.

use http::HeaderMap;
use serde_json::Value;

/// Header names containing any of these terms (case-insensitively) are
/// masked when sanitization is on.
pub const SENSITIVE_HEADER_TERMS: [&str; 6] = [
    "authorization",
    "auth",
    "token",
    "api-key",
    "x-api-key",
    "bearer",
];

/// Characters of a sensitive value kept before the ellipsis.
pub const MASK_PREFIX_CHARS: usize = 10;

/// Replacement for sensitive values too short to show a prefix of.
pub const MASKED_PLACEHOLDER: &str = "[REDACTED]";

/// Longest body shown in a log record, in characters.
pub const MAX_LOGGED_BODY_CHARS: usize = 1000;

/// Returns true if the header name looks like it carries a credential.
#[must_use]
pub fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_HEADER_TERMS
        .iter()
        .any(|term| lower.contains(term))
}

/// Masks the value of a sensitive header; other headers pass through.
///
/// A masked value keeps its first 10 characters followed by `...`;
/// values of 10 characters or fewer become [`MASKED_PLACEHOLDER`].
///
/// ```
/// use netcall::logging::sanitize_header_value;
///
/// assert_eq!(
///     sanitize_header_value("Authorization", "Bearer abcdef1234567890"),
///     "Bearer abc..."
/// );
/// assert_eq!(sanitize_header_value("Accept", "text/html"), "text/html");
/// ```
#[must_use]
pub fn sanitize_header_value(name: &str, value: &str) -> String {
    if !is_sensitive_header(name) {
        return value.to_string();
    }

    if value.chars().count() <= MASK_PREFIX_CHARS {
        return MASKED_PLACEHOLDER.to_string();
    }

    let prefix: String = value.chars().take(MASK_PREFIX_CHARS).collect();
    format!("{prefix}...")
}

/// Renders headers as a compact JSON object.
///
/// Repeated header names are joined with `, `.
#[must_use]
pub fn format_headers(headers: &HeaderMap, sanitize: bool) -> String {
    let mut rendered = serde_json::Map::new();

    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| {
                let value = String::from_utf8_lossy(value.as_bytes());
                if sanitize {
                    sanitize_header_value(name.as_str(), &value)
                } else {
                    value.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        rendered.insert(name.as_str().to_string(), Value::String(joined));
    }

    Value::Object(rendered).to_string()
}

/// Prepares a body for display.
///
/// Empty bodies render as `null`, JSON bodies are compacted, and the
/// result is cut to [`MAX_LOGGED_BODY_CHARS`] characters plus `...`.
#[must_use]
pub fn format_body(body: &str) -> String {
    if body.is_empty() {
        return "null".to_string();
    }

    let compact = serde_json::from_str::<Value>(body)
        .map_or_else(|_| body.to_string(), |value| value.to_string());

    truncate(compact)
}

fn truncate(text: String) -> String {
    match text.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
