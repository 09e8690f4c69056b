//! Production HTTP transport using reqwest, and the factory that builds it
//! from a [`ClientConfig`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::{ClientConfig, TlsConfig};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, TransportBuildError};

/// Production HTTP client using reqwest.
///
/// Wraps one pooled `reqwest::Client`. Cloning is cheap and clones share
/// the pool, so one instance serves every concurrent call.
///
/// # Example
///
/// ```no_run
/// use netcall::config::ClientConfig;
/// use netcall::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::from_config(&ClientConfig::new(Duration::from_secs(10)))?;
/// let url = Url::parse("https://api.example.com/items")?;
/// let request = HttpRequest::new(http::Method::POST, url).with_body(b"hello".to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    limiter: Option<Arc<HostLimiter>>,
    response_header_timeout: Option<Duration>,
}

impl ReqwestClient {
    /// Builds the pooled transport described by `config`.
    ///
    /// - `base_timeout` bounds each round trip including the body transfer.
    /// - Dial and TLS handshake timeouts together bound connection setup.
    /// - The response header timeout bounds the wait for response headers.
    /// - Idle timeout and per-host idle cap configure the pool.
    /// - `max_per_host` caps in-flight requests per host (0 = unlimited).
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] if TLS material cannot be loaded or
    /// the client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportBuildError> {
        let timeouts = &config.timeouts;

        let builder = reqwest::Client::builder()
            .timeout(config.base_timeout)
            .connect_timeout(timeouts.dial + timeouts.tls_handshake)
            .pool_idle_timeout(non_zero(timeouts.idle))
            .pool_max_idle_per_host(config.connection.max_idle_per_host);

        let inner = apply_tls(builder, &config.tls)?
            .build()
            .map_err(TransportBuildError::Build)?;

        let limiter = (config.connection.max_per_host > 0)
            .then(|| Arc::new(HostLimiter::new(config.connection.max_per_host)));

        Ok(Self {
            inner,
            limiter,
            response_header_timeout: non_zero(timeouts.response_header),
        })
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        // Held until the body has been read
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire(&req.url).await,
            None => None,
        };

        let mut builder = self.inner.request(req.method, req.url.as_str());

        // Append, never replace: repeated header names are all sent
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let sent = match self.response_header_timeout {
            Some(limit) => tokio::time::timeout(limit, builder.send())
                .await
                .map_err(|_| HttpError::Timeout)?,
            None => builder.send().await,
        };
        let response = sent.map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::Body(Box::new(e))
                }
            })?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn map_send_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else if e.is_redirect() {
        HttpError::Request(Box::new(e))
    } else if e.is_body() || e.is_decode() {
        HttpError::Body(Box::new(e))
    } else {
        match classify_connect(&e) {
            ConnectFailure::Tls => HttpError::Tls(Box::new(e)),
            ConnectFailure::Resolve => HttpError::Resolve(Box::new(e)),
            ConnectFailure::Other => HttpError::Connection(Box::new(e)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectFailure {
    Tls,
    Resolve,
    Other,
}

/// Sorts a failed round trip by walking its source chain.
///
/// rustls reports handshake and certificate failures as I/O errors of
/// kind `InvalidData`; hyper-util labels resolver failures "dns error".
fn classify_connect(error: &(dyn std::error::Error + 'static)) -> ConnectFailure {
    for cause in std::iter::successors(Some(error), |e| e.source()) {
        let invalid_data = cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::InvalidData);
        if invalid_data {
            return ConnectFailure::Tls;
        }
        if cause.to_string().starts_with("dns error") {
            return ConnectFailure::Resolve;
        }
    }
    ConnectFailure::Other
}

fn apply_tls(
    mut builder: reqwest::ClientBuilder,
    tls: &TlsConfig,
) -> Result<reqwest::ClientBuilder, TransportBuildError> {
    if !tls.verify_peer {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &tls.ca_path {
        let pem = read_pem("CA certificate", path)?;
        let certificate =
            reqwest::Certificate::from_pem(&pem).map_err(|e| TransportBuildError::InvalidPem {
                what: "CA certificate",
                path: path.clone(),
                source: e,
            })?;
        builder = builder.add_root_certificate(certificate);
    }

    match (&tls.cert_path, &tls.key_path) {
        (Some(cert_path), Some(key_path)) => {
            let mut pem = read_pem("client certificate", cert_path)?;
            pem.push(b'\n');
            pem.extend(read_pem("client key", key_path)?);
            let identity =
                reqwest::Identity::from_pem(&pem).map_err(|e| TransportBuildError::InvalidPem {
                    what: "client identity",
                    path: cert_path.clone(),
                    source: e,
                })?;
            builder = builder.identity(identity);
        }
        (None, None) => {}
        _ => return Err(TransportBuildError::IncompleteIdentity),
    }

    Ok(builder)
}

fn read_pem(what: &'static str, path: &Path) -> Result<Vec<u8>, TransportBuildError> {
    std::fs::read(path).map_err(|e| TransportBuildError::ReadPem {
        what,
        path: path.to_path_buf(),
        source: e,
    })
}

/// Treats a zero duration as "no limit".
fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

/// Caps concurrent round trips per `scheme://host:port`.
///
/// A host's entry is dropped once nobody holds or waits for its permits.
#[derive(Debug)]
struct HostLimiter {
    max_per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostLimiter {
    fn new(max_per_host: usize) -> Self {
        Self {
            max_per_host,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(self: &Arc<Self>, url: &url::Url) -> Option<HostPermit> {
        let key = format!(
            "{}://{}:{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.port_or_known_default().unwrap_or_default()
        );

        let semaphore = {
            let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                hosts
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_host))),
            )
        };

        // The semaphore is never closed, so this only fails in theory
        let permit = semaphore.acquire_owned().await.ok()?;

        Some(HostPermit {
            permit: Some(permit),
            limiter: Arc::clone(self),
            key,
        })
    }

    fn release(&self, key: &str) {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let idle = hosts
            .get(key)
            .is_some_and(|semaphore| Arc::strong_count(semaphore) == 1);
        if idle {
            hosts.remove(key);
        }
    }
}

/// A held per-host slot; releasing it may evict the host's entry.
#[derive(Debug)]
struct HostPermit {
    permit: Option<OwnedSemaphorePermit>,
    limiter: Arc<HostLimiter>,
    key: String,
}

impl Drop for HostPermit {
    fn drop(&mut self) {
        // The permit keeps the semaphore alive, so it goes first
        drop(self.permit.take());
        self.limiter.release(&self.key);
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
