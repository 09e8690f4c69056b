//! Shared test fixtures: scripted transport, recording sink, fixed clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::logging::{LogEvent, LogSink};
use crate::time::Clock;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Clock frozen at a fixed number of seconds after the epoch.
pub struct MockClock {
    secs: u64,
}

impl MockClock {
    pub const fn new(secs: u64) -> Self {
        Self { secs }
    }
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(self.secs)
    }
}

/// Sink that keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.kind.name()).collect()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, event: &LogEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// One scripted transport result.
pub enum Step {
    Respond(u16, &'static str),
    Fail(fn() -> HttpError),
    /// Waits (in tokio time) before responding 200.
    Delay(Duration),
}

/// Transport that replays a script and captures every request.
///
/// The last step repeats once the script is exhausted.
pub struct MockTransport {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn ok(body: &'static str) -> Arc<Self> {
        Self::new(vec![Step::Respond(200, body)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            return steps.pop_front().unwrap();
        }
        match steps.front().unwrap() {
            Step::Respond(status, body) => Step::Respond(*status, body),
            Step::Fail(make) => Step::Fail(*make),
            Step::Delay(d) => Step::Delay(*d),
        }
    }
}

impl HttpClient for Arc<MockTransport> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);

        match self.next_step() {
            Step::Respond(status, body) => Ok(HttpResponse::new(
                http::StatusCode::from_u16(status).unwrap(),
                http::HeaderMap::new(),
                body.as_bytes().to_vec(),
            )),
            Step::Fail(make) => Err(make()),
            Step::Delay(duration) => {
                tokio::time::sleep(duration).await;
                Ok(HttpResponse::new(
                    http::StatusCode::OK,
                    http::HeaderMap::new(),
                    b"late".to_vec(),
                ))
            }
        }
    }
}

pub fn connection_refused() -> HttpError {
    HttpError::Connection(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    )))
}

pub fn timed_out() -> HttpError {
    HttpError::Timeout
}

pub fn unexpected_eof() -> HttpError {
    HttpError::Body(Box::new(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "EOF",
    )))
}

pub fn tls_failure() -> HttpError {
    HttpError::Tls(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "received corrupt message of type InvalidContentType",
    )))
}

pub fn unknown_host() -> HttpError {
    HttpError::Resolve(Box::new(std::io::Error::other(
        "failed to lookup address information",
    )))
}

pub fn invalid_url() -> HttpError {
    HttpError::InvalidUrl("relative URL without a base".to_string())
}
