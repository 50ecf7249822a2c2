//! The aggregate risk report.
//!
//! [`ReportBuilder`] is the accumulator threaded through a run. It is moved
//! in, extended, and handed back; [`ReportBuilder::finish`] freezes it into a
//! [`RiskReport`].

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assessment::RiskAssessment;
use crate::error::CoreResult;
use crate::record::PatientRecord;

/// Three patient-ID lists, each in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Patients with total score at or above the threshold.
    pub high_risk_patients: IndexSet<String>,
    /// Patients with a valid temperature at or above 99.6 °F.
    pub fever_patients: IndexSet<String>,
    /// Patients with at least one missing or malformed signal.
    pub data_quality_issues: IndexSet<String>,
}

impl RiskReport {
    /// Classify a batch of records in one go.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PatientRecord>) -> Self {
        ReportBuilder::new().absorb(records).finish()
    }

    /// Serialize to the submission JSON shape.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Counts per list.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            patients_assessed: None,
            high_risk: self.high_risk_patients.len(),
            fever: self.fever_patients.len(),
            data_quality: self.data_quality_issues.len(),
        }
    }
}

/// Accumulates assessments into a report.
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    report: RiskReport,
    assessed: usize,
}

impl ReportBuilder {
    /// Start an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one assessment into the lists it qualifies for.
    pub fn add(&mut self, assessment: &RiskAssessment) {
        self.assessed += 1;
        let id = &assessment.patient_id;

        if assessment.is_high_risk() {
            self.report.high_risk_patients.insert(id.clone());
        }
        if assessment.has_fever {
            self.report.fever_patients.insert(id.clone());
        }
        if assessment.has_data_quality_issue() {
            self.report.data_quality_issues.insert(id.clone());
        }

        debug!(
            patient_id = %id,
            total = assessment.total(),
            fever = assessment.has_fever,
            data_quality_issue = assessment.has_data_quality_issue(),
            "Assessed patient"
        );
    }

    /// Assess and route a batch of records.
    #[must_use]
    pub fn absorb<'a>(mut self, records: impl IntoIterator<Item = &'a PatientRecord>) -> Self {
        for record in records {
            self.add(&RiskAssessment::of(record));
        }
        self
    }

    /// Number of assessments routed so far.
    pub fn assessed(&self) -> usize {
        self.assessed
    }

    /// Freeze into the final report.
    pub fn finish(self) -> RiskReport {
        self.report
    }

    /// Freeze and also return counts including the number of patients assessed.
    pub fn finish_with_summary(self) -> (RiskReport, ReportSummary) {
        let summary = ReportSummary {
            patients_assessed: Some(self.assessed),
            ..self.report.summary()
        };
        (self.report, summary)
    }
}

/// Per-list counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of records classified, when known.
    pub patients_assessed: Option<usize>,
    /// High-risk count.
    pub high_risk: usize,
    /// Fever count.
    pub fever: usize,
    /// Data-quality count.
    pub data_quality: usize,
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.patients_assessed {
            write!(f, "{n} patients assessed, ")?;
        }
        write!(
            f,
            "{} high risk, {} fever, {} data quality issues",
            self.high_risk, self.fever, self.data_quality
        )
    }
}
