//! # vitals-client
//!
//! Client for the paginated patient API.
//!
//! [`PatientClient::collect_all_records`] walks `GET /patients?page=n&limit=10`
//! strictly one page at a time until the server reports no next page. Each
//! page goes through the retrying fetcher from `vitals-retries`. The first
//! page's declared total is compared with what was collected; a mismatch is
//! logged, never fatal.
//!
//! ## Example
//!
//! ```ignore
//! use vitals_client::{ClientConfig, PatientClient};
//! use vitals_core::RiskReport;
//!
//! let client = PatientClient::new(ClientConfig::with_api_key(key))?;
//! let collection = client.collect_all_records().await?;
//! let report = RiskReport::from_records(&collection.records);
//! client.submit_assessment(&report).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use client::{Collection, PatientClient};
pub use config::{ClientConfig, API_KEY_HEADER, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use envelope::{PageEnvelope, Pagination};
pub use error::{ClientError, ClientResult};
