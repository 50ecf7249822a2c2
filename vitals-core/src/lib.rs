//! # vitals-core
//!
//! Patient records and the deterministic risk classifier.
//!
//! - **Records**: [`PatientRecord`] keeps clinical fields as raw JSON
//! - **Readings**: [`Reading`] turns each field into a valid value, or a
//!   missing/malformed marker
//! - **Scoring**: blood pressure, temperature and age each score 0–3 points
//! - **Reports**: [`ReportBuilder`] routes assessments into a [`RiskReport`]
//!
//! Classification never fails. Unusable readings score zero and put the
//! patient on the data-quality list.
//!
//! ## Example
//!
//! ```rust
//! use vitals_core::{PatientRecord, RiskReport};
//!
//! let records = vec![
//!     PatientRecord::new("P1").blood_pressure("150/95").temperature(101.2).age(70),
//!     PatientRecord::new("P2").blood_pressure("INVALID").temperature(98.2).age(30),
//! ];
//!
//! let report = RiskReport::from_records(&records);
//! assert!(report.high_risk_patients.contains("P1"));
//! assert!(report.fever_patients.contains("P1"));
//! assert!(report.data_quality_issues.contains("P2"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod assessment;
pub mod error;
pub mod reading;
pub mod record;
pub mod report;
pub mod scoring;

// Re-exports for convenience
pub use assessment::{RiskAssessment, HIGH_RISK_THRESHOLD};
pub use error::{CoreError, CoreResult};
pub use reading::{BloodPressure, Reading};
pub use record::PatientRecord;
pub use report::{ReportBuilder, ReportSummary, RiskReport};
pub use scoring::{
    is_fever, score_age, score_blood_pressure, score_temperature, BloodPressureCategory,
    SignalScore, FEVER_THRESHOLD, HIGH_FEVER_THRESHOLD,
};
