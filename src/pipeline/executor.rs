//! The execution pipeline: one call, many attempts, one outcome.

use std::time::Duration;

use http::Method;
use tokio::time::{Instant, timeout_at};

use crate::config::ClientConfig;
use crate::logging::RequestLogger;
use crate::payload::{EncodedRequest, encode};
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest};

use super::{CallError, RequestIntent, RetryPolicy};

/// Runs calls against a transport with a shared deadline and fixed-delay
/// retries.
///
/// For each call the pipeline:
/// 1. encodes the payload once,
/// 2. starts a deadline of `base_timeout` covering every attempt,
/// 3. sends up to `max_retries + 1` attempts, sleeping `retry_delay` before
///    each retry,
/// 4. returns the body of the first 2xx response or the last failure.
///
/// Deadline expiry during a sleep or an attempt ends the call with
/// [`CallError::Deadline`]. Dropping the returned future cancels the call.
///
/// # Type Parameters
///
/// - `H`: The transport
/// - `S`: The sleeper for retry delays (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct Pipeline<H, S = TokioSleeper> {
    transport: H,
    sleeper: S,
    base_timeout: Duration,
    retry: RetryPolicy,
    logger: RequestLogger,
}

impl<H> Pipeline<H, TokioSleeper> {
    /// Creates a pipeline taking its deadline, retry, and logging settings
    /// from `config`.
    #[must_use]
    pub fn new(transport: H, config: &ClientConfig) -> Self {
        Self {
            transport,
            sleeper: TokioSleeper,
            base_timeout: config.base_timeout,
            retry: config.retry.clone(),
            logger: RequestLogger::new(config.logging),
        }
    }
}

impl<H, S> Pipeline<H, S> {
    /// Replaces the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Pipeline<H, S2> {
        Pipeline {
            transport: self.transport,
            sleeper,
            base_timeout: self.base_timeout,
            retry: self.retry,
            logger: self.logger,
        }
    }

    /// Replaces the request logger.
    #[must_use]
    pub fn with_logger(mut self, logger: RequestLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the per-call deadline.
    #[must_use]
    pub const fn base_timeout(&self) -> Duration {
        self.base_timeout
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &H {
        &self.transport
    }
}

impl<H: HttpClient, S: Sleeper> Pipeline<H, S> {
    /// Executes one call and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's [`CallError`] once retries are exhausted
    /// or the failure is not retryable, or [`CallError::Deadline`] when the
    /// shared deadline expires first. Non-2xx failures carry the response
    /// body.
    pub async fn execute(&self, intent: RequestIntent) -> Result<String, CallError> {
        let started = Instant::now();
        let deadline = started + self.base_timeout;

        let RequestIntent {
            method,
            description,
            url,
            payload,
            headers,
        } = intent;

        let request = match encode(&method, &url, payload, headers) {
            Ok(request) => request,
            Err(e) => {
                let error = CallError::from(e);
                self.logger.error(&description, &error.to_string(), None);
                return Err(error);
            }
        };

        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            let outcome = timeout_at(deadline, self.attempt(&method, &description, &request)).await;
            let Ok(outcome) = outcome else {
                return Err(self.deadline_exceeded(&description, started));
            };

            let error = match outcome {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            if attempt >= max_attempts || !self.retry.should_retry(&error) {
                return Err(error);
            }

            attempt += 1;
            self.logger.info(
                &description,
                &format!("Retrying request (attempt {attempt}/{max_attempts}) after: {error}"),
            );

            if timeout_at(deadline, self.sleeper.sleep(self.retry.retry_delay))
                .await
                .is_err()
            {
                return Err(self.deadline_exceeded(&description, started));
            }
        }
    }

    /// Sends one attempt and classifies the response.
    async fn attempt(
        &self,
        method: &Method,
        description: &str,
        request: &EncodedRequest,
    ) -> Result<String, CallError> {
        let mut outbound = HttpRequest::new(method.clone(), request.url.clone());
        outbound.headers = request.headers.clone();
        if let Some(factory) = &request.body {
            outbound = outbound.with_body(factory.produce());
        }

        self.logger.request(
            description,
            method,
            &request.url,
            &request.headers,
            &request.log_body,
        );

        let sent = Instant::now();
        let response = match self.transport.request(outbound).await {
            Ok(response) => response,
            Err(e) => {
                self.logger
                    .error(description, &e.to_string(), Some(sent.elapsed()));
                return Err(e.into());
            }
        };

        let body = response.body_text();
        self.logger
            .response(description, response.status, sent.elapsed(), &body);

        if response.is_success() {
            Ok(body)
        } else {
            Err(CallError::Status {
                status: response.status,
                body,
            })
        }
    }

    fn deadline_exceeded(&self, description: &str, started: Instant) -> CallError {
        let error = CallError::Deadline {
            timeout: self.base_timeout,
        };
        self.logger
            .error(description, &error.to_string(), Some(started.elapsed()));
        error
    }
}
