//! HTTP transport with automatic retries.

use crate::config::RetryConfig;
use crate::error::{RetryResult, RetryableError};
use crate::executor::Retry;
use crate::sleep::{Sleeper, TokioSleeper};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

impl From<reqwest::Error> for RetryableError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RetryableError::Timeout
        } else if err.is_connect() || err.is_request() {
            RetryableError::Connection(err.to_string())
        } else {
            RetryableError::Other(err.into())
        }
    }
}

/// A single outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Create a POST request with a JSON body.
    pub fn post_json<B: Serialize>(url: impl Into<String>, body: &B) -> RetryResult<Self> {
        let body = serde_json::to_value(body).map_err(anyhow::Error::from)?;
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The response of a request that reached the server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed Retry-After header.
    pub retry_after: Option<Duration>,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    /// Attach a Retry-After hint.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Black-box request/response function.
///
/// Returns `Ok` for any response that reached the server, whatever its
/// status, and `Err` only when no response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request.
    async fn send(&self, request: &HttpRequest) -> RetryResult<HttpResponse>;
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create with a default reqwest client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Create with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> RetryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> RetryResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Making HTTP request");

        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Parse a Retry-After value expressed in (possibly fractional) seconds.
///
/// Values too large for a `Duration` are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

/// Map a response to an error when its status is not 2xx.
pub fn check_response(response: HttpResponse) -> RetryResult<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    Err(RetryableError::Http {
        status: response.status,
        body: response.body,
        retry_after: response.retry_after,
    })
}

/// HTTP client wrapper with automatic retries.
#[derive(Clone)]
pub struct RetryClient {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    config: RetryConfig,
}

impl std::fmt::Debug for RetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryClient")
            .field("config", &self.config)
            .finish()
    }
}

impl RetryClient {
    /// Create a retry client over the reqwest transport.
    pub fn new(config: RetryConfig) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), config)
    }

    /// Create with a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            config,
        }
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the retry config.
    pub fn with_config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Get a reference to the retry config.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a GET request with retries.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> RetryResult<HttpResponse> {
        let mut request = HttpRequest::get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(&request).await
    }

    /// Execute a JSON POST request with retries.
    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &B,
    ) -> RetryResult<HttpResponse> {
        let mut request = HttpRequest::post_json(url, body)?;
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send(&request).await
    }

    /// Execute a request with retries, resolving to the first 2xx response.
    pub async fn send(&self, request: &HttpRequest) -> RetryResult<HttpResponse> {
        let transport = self.transport.as_ref();

        Retry::new(&self.config)
            .sleeper(self.sleeper.as_ref())
            .target(&request.url)
            .run(|| async move { check_response(transport.send(request).await?) })
            .await
    }
}
