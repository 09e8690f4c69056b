//! Caller-facing client: a configured pipeline plus one method per verb.

use std::sync::Arc;

use http::{HeaderMap, Method};
use serde::Serialize;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError};
use crate::logging::{LogSink, RequestLogger};
use crate::payload::{EncodeError, Payload};
use crate::pipeline::{CallError, Pipeline, RequestIntent};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, ReqwestClient, TransportBuildError};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Error raised while constructing a [`Client`].
#[derive(Debug, Error)]
pub enum InitError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The transport could not be built from the configuration.
    #[error(transparent)]
    Transport(#[from] TransportBuildError),
}

/// An HTTP client with centralized timeout, retry, and logging policy.
///
/// Every method runs one call through the same [`Pipeline`]: the payload is
/// encoded once, attempts share a deadline of `base_timeout`, and failures
/// in the retryable set are retried after a fixed delay.
///
/// Methods return the response body on 2xx. On failure the [`CallError`]
/// carries the body of a non-2xx response, see [`CallError::body`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use http::HeaderMap;
/// use netcall::Client;
/// use netcall::config::ClientConfig;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(ClientConfig::new(Duration::from_secs(10)))?;
/// let body = client
///     .get("list users", "https://api.example.com/users", [("page", "2")], HeaderMap::new())
///     .await?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<H = ReqwestClient, S = TokioSleeper> {
    config: ClientConfig,
    pipeline: Pipeline<H, S>,
}

impl Client {
    /// Validates `config` and builds a client on the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Config`] if validation fails and
    /// [`InitError::Transport`] if TLS material cannot be loaded.
    pub fn new(config: ClientConfig) -> Result<Self, InitError> {
        config.validate()?;
        let transport = ReqwestClient::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<H> Client<H> {
    /// Creates a client on a custom transport.
    ///
    /// The configuration is used as-is; transport settings in it are ignored.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: H) -> Self {
        let pipeline = Pipeline::new(transport, &config);
        Self { config, pipeline }
    }
}

impl<H, S> Client<H, S> {
    /// Replaces the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Client<H, S2> {
        Client {
            config: self.config,
            pipeline: self.pipeline.with_sleeper(sleeper),
        }
    }

    /// Sends log events to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_log_sink(self, sink: Arc<dyn LogSink>) -> Self {
        let logger = RequestLogger::new(self.config.logging).with_sink(sink);
        Self {
            config: self.config,
            pipeline: self.pipeline.with_logger(logger),
        }
    }

    /// Returns the configuration the client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl<H: HttpClient, S: Sleeper> Client<H, S> {
    /// Executes a fully described call.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn execute(&self, intent: RequestIntent) -> Result<String, CallError> {
        self.pipeline.execute(intent).await
    }

    /// Sends a GET with `params` as query parameters.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn get<I, K, V>(
        &self,
        description: &str,
        url: &str,
        params: I,
        headers: HeaderMap,
    ) -> Result<String, CallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.send(Method::GET, description, url, Payload::from_pairs(params), headers)
            .await
    }

    /// Sends a DELETE with `params` as query parameters.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn delete<I, K, V>(
        &self,
        description: &str,
        url: &str,
        params: I,
        headers: HeaderMap,
    ) -> Result<String, CallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.send(Method::DELETE, description, url, Payload::from_pairs(params), headers)
            .await
    }

    /// Sends a HEAD with `params` as query parameters.
    ///
    /// The returned body is always empty.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn head<I, K, V>(
        &self,
        description: &str,
        url: &str,
        params: I,
        headers: HeaderMap,
    ) -> Result<String, CallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.send(Method::HEAD, description, url, Payload::from_pairs(params), headers)
            .await
    }

    /// Sends an OPTIONS with `params` as query parameters.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn options<I, K, V>(
        &self,
        description: &str,
        url: &str,
        params: I,
        headers: HeaderMap,
    ) -> Result<String, CallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.send(Method::OPTIONS, description, url, Payload::from_pairs(params), headers)
            .await
    }

    /// Sends a POST with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Encoding`] if `body` cannot be serialized;
    /// otherwise see [`Pipeline::execute`].
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        description: &str,
        url: &str,
        body: &T,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::POST, description, url, json_payload(body)?, headers)
            .await
    }

    /// Sends a PUT with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Encoding`] if `body` cannot be serialized;
    /// otherwise see [`Pipeline::execute`].
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        description: &str,
        url: &str,
        body: &T,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PUT, description, url, json_payload(body)?, headers)
            .await
    }

    /// Sends a PATCH with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Encoding`] if `body` cannot be serialized;
    /// otherwise see [`Pipeline::execute`].
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        description: &str,
        url: &str,
        body: &T,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PATCH, description, url, json_payload(body)?, headers)
            .await
    }

    /// Sends a POST whose body is `text` as a JSON string literal.
    ///
    /// An empty `text` sends no body.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn post_text(
        &self,
        description: &str,
        url: &str,
        text: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::POST, description, url, Payload::Text(text.into()), headers)
            .await
    }

    /// Sends a PUT whose body is `text` as a JSON string literal.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn put_text(
        &self,
        description: &str,
        url: &str,
        text: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PUT, description, url, Payload::Text(text.into()), headers)
            .await
    }

    /// Sends a PATCH whose body is `text` as a JSON string literal.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn patch_text(
        &self,
        description: &str,
        url: &str,
        text: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PATCH, description, url, Payload::Text(text.into()), headers)
            .await
    }

    /// Sends a POST with `xml` as the body, byte-for-byte.
    ///
    /// Adds `Content-Type: text/xml; charset=UTF-8` unless `headers`
    /// already sets a content type.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn post_xml(
        &self,
        description: &str,
        url: &str,
        xml: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::POST, description, url, Payload::Xml(xml.into()), headers)
            .await
    }

    /// Sends a PUT with `xml` as the body, byte-for-byte.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn put_xml(
        &self,
        description: &str,
        url: &str,
        xml: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PUT, description, url, Payload::Xml(xml.into()), headers)
            .await
    }

    /// Sends a PATCH with `xml` as the body, byte-for-byte.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::execute`].
    pub async fn patch_xml(
        &self,
        description: &str,
        url: &str,
        xml: impl Into<String>,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        self.send(Method::PATCH, description, url, Payload::Xml(xml.into()), headers)
            .await
    }

    async fn send(
        &self,
        method: Method,
        description: &str,
        url: &str,
        payload: Payload,
        headers: HeaderMap,
    ) -> Result<String, CallError> {
        let intent = RequestIntent::new(method, description, url)
            .with_payload(payload)
            .with_headers(headers);
        self.pipeline.execute(intent).await
    }
}

fn json_payload<T: Serialize + ?Sized>(body: &T) -> Result<Payload, CallError> {
    serde_json::to_value(body)
        .map(Payload::Json)
        .map_err(|e| CallError::Encoding(EncodeError::Json(e)))
}
