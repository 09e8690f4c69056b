//! Reusable request body source.

use std::fmt;
use std::sync::Arc;

/// Produces a fresh request body on every call.
///
/// Each attempt of a call asks the factory for its own body, so a body
/// consumed or altered by one attempt can never leak into the next.
#[derive(Clone)]
pub struct BodyFactory {
    make: Arc<dyn Fn() -> Vec<u8> + Send + Sync>,
}

impl BodyFactory {
    /// Creates a factory from an arbitrary body-producing closure.
    pub fn new(make: impl Fn() -> Vec<u8> + Send + Sync + 'static) -> Self {
        Self {
            make: Arc::new(make),
        }
    }

    /// Creates a factory that always yields a copy of `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let shared: Arc<[u8]> = bytes.into();
        Self::new(move || shared.to_vec())
    }

    /// Produces a new body.
    #[must_use]
    pub fn produce(&self) -> Vec<u8> {
        (self.make)()
    }
}

impl fmt::Debug for BodyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyFactory").finish_non_exhaustive()
    }
}
