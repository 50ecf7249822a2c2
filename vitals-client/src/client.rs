//! Paginated retrieval and assessment submission.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};
use vitals_core::{PatientRecord, RiskReport};
use vitals_retries::{ReqwestTransport, RetryClient, RetryConfig, Sleeper, Transport};

use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::envelope::PageEnvelope;
use crate::error::ClientResult;

/// Everything retrieved by one pagination run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// Records from every page, in page order.
    pub records: Vec<PatientRecord>,
    /// Total declared by the first page.
    pub declared_total: Option<u64>,
    /// Number of pages fetched.
    pub pages_fetched: u32,
}

impl Collection {
    /// `(declared, actual)` when the first page's total disagrees with what was collected.
    pub fn count_mismatch(&self) -> Option<(u64, usize)> {
        let declared = self.declared_total?;
        let actual = self.records.len();
        (declared != actual as u64).then_some((declared, actual))
    }
}

/// Client for the patient API.
#[derive(Debug, Clone)]
pub struct PatientClient {
    http: RetryClient,
    config: ClientConfig,
}

impl PatientClient {
    /// Create a client over HTTP.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(config.timeout_seconds))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        config.validate()?;
        let http = RetryClient::with_transport(transport, config.retry_config());
        Ok(Self { http, config })
    }

    /// Replace the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.http = self.http.with_sleeper(sleeper);
        self
    }

    /// Replace the retry settings.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.http = self.http.with_config(retry);
        self
    }

    /// Get the config.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn auth(&self) -> [(&str, &str); 1] {
        [(API_KEY_HEADER, self.config.api_key.as_str())]
    }

    /// Fetch and parse a single page.
    pub async fn fetch_page(&self, page: u32) -> ClientResult<PageEnvelope> {
        let url = self.config.page_url(page)?;
        let response = self.http.get(url.as_str(), &self.auth()).await?;
        PageEnvelope::parse(&response.body, page)
    }

    /// Fetch pages 1, 2, ... until the server reports no further page.
    ///
    /// There is no page cap: a server that always reports another page keeps
    /// this loop running.
    pub async fn collect_all_records(&self) -> ClientResult<Collection> {
        let mut collection = Collection::default();
        let mut page = 1;
        let mut has_next = true;

        while has_next {
            let envelope = self.fetch_page(page).await?;
            debug!(
                page,
                records = envelope.data.len(),
                has_next = envelope.pagination.has_next,
                "Fetched page"
            );

            if page == 1 {
                collection.declared_total = envelope.pagination.total;
            }
            has_next = envelope.pagination.has_next;
            collection.records.extend(envelope.data);
            collection.pages_fetched = page;
            page += 1;
        }

        match collection.count_mismatch() {
            Some((declared, actual)) => warn!(
                declared,
                actual,
                "Collected record count differs from declared total"
            ),
            None => info!(
                records = collection.records.len(),
                pages = collection.pages_fetched,
                "Collected all records"
            ),
        }

        Ok(collection)
    }

    /// Submit a report to `POST /submit-assessment` and return the server's reply.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    pub async fn submit_assessment(&self, report: &RiskReport) -> ClientResult<Value> {
        let url = self.config.endpoint("submit-assessment")?;
        let response = self
            .http
            .post_json(url.as_str(), &self.auth(), report)
            .await?;

        info!(status = response.status, "Assessment submitted");
        Ok(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
    }
}
