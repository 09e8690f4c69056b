//! Execution of the `send` command.
//!
//! Builds a client from the validated configuration, sends the request,
//! and races it against Ctrl+C/SIGTERM. Dropping the in-flight call on a
//! signal cancels it.

use thiserror::Error;
use tokio::signal;

use netcall::config::ValidatedConfig;
use netcall::{CallError, Client, InitError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for `send` failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The client could not be built.
    #[error("Failed to create client: {0}")]
    Init(#[from] InitError),

    /// The call failed.
    #[error(transparent)]
    Call(#[from] CallError),

    /// A shutdown signal arrived before the call finished.
    #[error("Interrupted before the response arrived")]
    Interrupted,
}

impl RunError {
    /// Returns the response body carried by a non-2xx failure.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Call(e) => e.body(),
            _ => None,
        }
    }
}

/// Sends the configured request and returns the response body.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the call fails, or a
/// shutdown signal arrives first.
pub async fn execute(config: ValidatedConfig) -> Result<String, RunError> {
    let client = Client::new(config.client)?;

    tokio::select! {
        result = client.execute(config.intent) => Ok(result?),
        () = shutdown_signal() => {
            tracing::warn!("Shutdown signal received, abandoning request");
            Err(RunError::Interrupted)
        }
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Never completes if the handlers cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::debug!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::debug!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
