//! netcall: an outbound HTTP client with centralized policy.
//!
//! One [`Client`] issues REST calls with a shared per-call deadline,
//! fixed-delay retries, connection pooling, and request/response logging,
//! all taken from a validated [`ClientConfig`](config::ClientConfig).
//!
//! Use [`Client::new`] for an explicitly owned client, or [`shared`] and
//! [`init`] for a process-wide instance.

mod client;
pub mod config;
pub mod logging;
pub mod payload;
pub mod pipeline;
mod shared;
pub mod time;
pub mod transport;

#[cfg(test)]
mod test_fixtures;

pub use client::{Client, InitError};
pub use pipeline::{CallError, RequestIntent};
pub use shared::{init, shared};
