//! Scripted transport and sleeper for testing.
//!
//! - [`ScriptedTransport`]: replays a queue of canned outcomes in order
//! - [`RecordingSleeper`]: records requested delays and returns immediately
//!
//! ```rust
//! use vitals_retries::mock::ScriptedTransport;
//! use vitals_retries::HttpResponse;
//!
//! let transport = ScriptedTransport::new()
//!     .respond(HttpResponse::new(503, ""))
//!     .respond(HttpResponse::new(200, "{}"));
//! assert_eq!(transport.remaining(), 2);
//! ```

use crate::error::{RetryResult, RetryableError};
use crate::sleep::Sleeper;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Transport that replays pre-configured outcomes.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<RetryResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, response: HttpResponse) -> Self {
        self.outcomes.lock().push_back(Ok(response));
        self
    }

    /// Queue a JSON 200 response.
    pub fn respond_json(self, body: &serde_json::Value) -> Self {
        self.respond(HttpResponse::new(200, body.to_string()))
    }

    /// Queue a transport failure.
    pub fn fail(self, error: RetryableError) -> Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().len()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> RetryResult<HttpResponse> {
        self.requests.lock().push(request.clone());
        self.outcomes.lock().pop_front().unwrap_or_else(|| {
            Err(RetryableError::Other(anyhow::anyhow!(
                "no scripted response left for {}",
                request.url
            )))
        })
    }
}

/// Sleeper that records delays instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Create a new recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    /// Number of sleeps requested.
    pub fn calls(&self) -> usize {
        self.delays.lock().len()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().push(duration);
    }
}
