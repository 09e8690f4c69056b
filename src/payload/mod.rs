//! Payload codec: turns a method, URL, and payload into wire form.
//!
//! - Body-less methods (GET, DELETE, HEAD, OPTIONS) carry structured
//!   payloads as query parameters.
//! - Body methods (POST, PUT, PATCH, ...) carry structured payloads as JSON
//!   and raw strings as a quoted JSON string.
//! - XML payloads bypass both and are sent verbatim with a default
//!   `Content-Type`.
//!
//! The encoded body is handed to the pipeline as a [`BodyFactory`] so
//! every attempt receives a fresh copy.

mod body;
mod codec;
mod error;


pub use body::BodyFactory;
pub use codec::{EncodedRequest, Payload, XML_CONTENT_TYPE, encode, is_query_method};
pub use error::EncodeError;
