//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;
use vitals_retries::{RetryConfig, DEFAULT_MAX_RETRIES};

use crate::error::{ClientError, ClientResult};

/// Base URL of the assessment API.
pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api";

/// Records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for the patient API client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent with every request.
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Base URL; endpoint paths are appended to it.
    pub base_url: Url,
    /// Records per page.
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries after the first attempt of each request.
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_seconds: 30,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config with an API key and the default endpoint.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: &str) -> ClientResult<Self> {
        self.base_url = Url::parse(url)?;
        Ok(self)
    }

    /// Set the page size.
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    /// Set the retry budget.
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> ClientResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::config("API key is empty"));
        }
        if self.page_size == 0 {
            return Err(ClientError::config("page size must be positive"));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ClientError::config(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Retry settings derived from this config.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().max_retries(self.max_retries)
    }

    /// Resolve an endpoint path under the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::config("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// URL of one page of patients.
    pub fn page_url(&self, page: u32) -> ClientResult<Url> {
        let mut url = self.endpoint("patients")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &self.page_size.to_string());
        Ok(url)
    }
}
