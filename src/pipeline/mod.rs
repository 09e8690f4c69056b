//! Execution pipeline: turns a [`RequestIntent`] into a single outcome.
//!
//! This module provides:
//! - The call description ([`RequestIntent`])
//! - Retry configuration and decisions ([`RetryPolicy`])
//! - The tagged failure taxonomy ([`CallError`])
//! - The deadline-scoped retry loop ([`Pipeline`])

mod error;
mod executor;
mod intent;
mod retry;

#[cfg(test)]
mod retry_tests;

pub use error::CallError;
pub use executor::Pipeline;
pub use intent::RequestIntent;
pub use retry::RetryPolicy;
