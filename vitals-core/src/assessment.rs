//! Per-patient risk assessment.

use serde::{Deserialize, Serialize};

use crate::record::PatientRecord;
use crate::scoring::{is_fever, score_age, score_blood_pressure, score_temperature, SignalScore};

/// Total score at or above which a patient is high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 4;

/// Scores and flags for one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Patient identifier.
    pub patient_id: String,
    /// Blood pressure score.
    pub blood_pressure: SignalScore,
    /// Temperature score.
    pub temperature: SignalScore,
    /// Age score.
    pub age: SignalScore,
    /// Valid temperature reading at or above the fever threshold.
    pub has_fever: bool,
}

impl RiskAssessment {
    /// Assess a record. Never fails.
    pub fn of(record: &PatientRecord) -> Self {
        let temperature = record.temperature_reading();

        Self {
            patient_id: record.patient_id.clone(),
            blood_pressure: score_blood_pressure(&record.blood_pressure_reading()),
            temperature: score_temperature(&temperature),
            age: score_age(&record.age_reading()),
            has_fever: is_fever(&temperature),
        }
    }

    /// Sum of the three signal scores.
    pub fn total(&self) -> u32 {
        self.blood_pressure.points + self.temperature.points + self.age.points
    }

    /// Whether the total reaches the high-risk threshold.
    pub fn is_high_risk(&self) -> bool {
        self.total() >= HIGH_RISK_THRESHOLD
    }

    /// Whether any signal was missing or malformed.
    pub fn has_data_quality_issue(&self) -> bool {
        self.blood_pressure.data_quality_issue
            || self.temperature.data_quality_issue
            || self.age.data_quality_issue
    }
}
