//! # vitals
//!
//! Retrieve paginated patient records, classify each patient's risk, and
//! report three patient-ID lists: high risk, fever, and data-quality issues.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vitals::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PatientClient::new(ClientConfig::with_api_key("your-key"))?;
//!     let outcome = vitals::pipeline::run(&client).await?;
//!     println!("{}", outcome.summary);
//!     client.submit_assessment(&outcome.report).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! - [`retries`]: retrying fetcher (backoff, jitter, Retry-After)
//! - [`client`]: pagination driver and submission
//! - [`core`]: records, readings, scoring, reports

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod pipeline;

/// Records, scoring and reports.
pub use vitals_core as core;

/// Patient API client.
pub use vitals_client as client;

/// Retrying fetcher.
pub use vitals_retries as retries;

pub use pipeline::{classify, run, RunOutcome};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::pipeline::{run, RunOutcome};
    pub use vitals_client::{ClientConfig, ClientError, Collection, PatientClient};
    pub use vitals_core::{PatientRecord, ReportBuilder, RiskAssessment, RiskReport};
    pub use vitals_retries::{RetryConfig, RetryableError};
}
