//! Process-wide shared client.
//!
//! [`shared`] lazily creates a client with the default configuration;
//! [`init`] replaces it. Callers holding an `Arc` from before an `init`
//! keep using the old client until they drop it.

use std::sync::{Arc, PoisonError, RwLock};

use crate::client::{Client, InitError};
use crate::config::ClientConfig;

static SHARED: RwLock<Option<Arc<Client>>> = RwLock::new(None);

/// Validates `config`, builds a client, and installs it as the shared one.
///
/// # Errors
///
/// Returns [`InitError`] if the configuration is invalid or the transport
/// cannot be built. The previously shared client stays in place.
pub fn init(config: ClientConfig) -> Result<Arc<Client>, InitError> {
    let client = Arc::new(Client::new(config)?);
    *SHARED.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&client));
    tracing::debug!("Shared client initialized");
    Ok(client)
}

/// Returns the shared client, creating one with defaults on first use.
///
/// # Errors
///
/// Returns [`InitError`] if the default transport cannot be built.
pub fn shared() -> Result<Arc<Client>, InitError> {
    if let Some(client) = SHARED.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return Ok(Arc::clone(client));
    }

    let mut slot = SHARED.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(client) = slot.as_ref() {
        return Ok(Arc::clone(client));
    }

    let client = Arc::new(Client::new(ClientConfig::default())?);
    *slot = Some(Arc::clone(&client));
    Ok(client)
}
