//! Payload encoding rules.

use std::collections::BTreeMap;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use url::Url;

use super::{BodyFactory, EncodeError};

/// `Content-Type` injected for XML payloads when the caller set none.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// The payload of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload.
    Empty,
    /// Structured payload: query parameters for body-less methods,
    /// JSON body otherwise. `Null` behaves like [`Payload::Empty`].
    Json(Value),
    /// Raw string, sent as a quoted JSON string (`foo` becomes `"foo"`).
    /// Ignored by body-less methods; an empty string sends no body.
    Text(String),
    /// Raw XML, sent byte-for-byte regardless of method.
    Xml(String),
}

impl Payload {
    /// Builds a structured payload from string pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect::<serde_json::Map<_, _>>();
        Self::Json(Value::Object(map))
    }
}

/// A request in wire form, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    /// Final URL including any query parameters from the payload.
    pub url: Url,
    /// Caller headers plus any injected by the codec.
    pub headers: HeaderMap,
    /// Body source, `None` when the request has no body.
    pub body: Option<BodyFactory>,
    /// The body as text for logging; empty when there is no body.
    pub log_body: String,
}

/// Returns true for methods whose payload travels in the query string.
#[must_use]
pub fn is_query_method(method: &Method) -> bool {
    *method == Method::GET
        || *method == Method::DELETE
        || *method == Method::HEAD
        || *method == Method::OPTIONS
}

/// Encodes a payload for the given method and URL.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidUrl`] if `url` does not parse,
/// [`EncodeError::QueryNotObject`] if a body-less method gets a
/// non-object JSON payload, and [`EncodeError::Json`] if serialization
/// fails.
pub fn encode(
    method: &Method,
    url: &str,
    payload: Payload,
    mut headers: HeaderMap,
) -> Result<EncodedRequest, EncodeError> {
    let mut url = Url::parse(url).map_err(|e| EncodeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let body = match payload {
        Payload::Xml(xml) => {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
            }
            Some(xml)
        }
        Payload::Empty | Payload::Json(Value::Null) => None,
        Payload::Json(value) if is_query_method(method) => {
            let Value::Object(fields) = value else {
                return Err(EncodeError::QueryNotObject {
                    method: method.clone(),
                });
            };
            apply_query(&mut url, &fields);
            None
        }
        Payload::Json(value) => Some(serde_json::to_string(&value)?),
        Payload::Text(_) if is_query_method(method) => None,
        Payload::Text(text) if text.is_empty() => None,
        Payload::Text(text) => Some(serde_json::to_string(&text)?),
    };

    Ok(match body {
        Some(text) => EncodedRequest {
            url,
            headers,
            body: Some(BodyFactory::from_bytes(text.clone().into_bytes())),
            log_body: text,
        },
        None => EncodedRequest {
            url,
            headers,
            body: None,
            log_body: String::new(),
        },
    })
}

/// Sets payload fields as query parameters.
///
/// Fields replace same-named parameters already in the URL; other
/// parameters are kept. The resulting query is sorted by key.
fn apply_query(url: &mut Url, fields: &serde_json::Map<String, Value>) {
    if fields.is_empty() {
        return;
    }

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs().into_owned() {
        params.entry(key).or_default().push(value);
    }
    for (key, value) in fields {
        params.insert(key.clone(), vec![query_value(value)]);
    }

    let mut query = url.query_pairs_mut();
    query.clear();
    for (key, values) in &params {
        for value in values {
            query.append_pair(key, value);
        }
    }
}

/// Renders a JSON value as a query parameter value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
