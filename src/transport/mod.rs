//! Transport layer: one HTTP round trip per request.
//!
//! This module provides:
//! - HTTP request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The transport abstraction ([`HttpClient`])
//! - The production transport and its factory ([`ReqwestClient`])

mod client;
mod error;
mod http;


pub use client::ReqwestClient;
pub use error::{HttpError, TransportBuildError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
