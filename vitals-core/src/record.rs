//! Patient records as delivered by the API.
//!
//! Nothing about a record is trusted: the clinical fields are kept as raw JSON
//! and only interpreted by [`reading`](crate::reading).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::reading::{BloodPressure, Reading};

/// A single patient record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Opaque patient identifier.
    #[serde(default, deserialize_with = "lenient_id")]
    pub patient_id: String,
    /// Raw blood pressure, expected as `"<systolic>/<diastolic>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<Value>,
    /// Raw body temperature in °F.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    /// Raw age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    /// Remaining fields (name, gender, visit date, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientRecord {
    /// Create a record with no clinical fields.
    #[must_use]
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }

    /// Set the raw blood pressure value.
    #[must_use]
    pub fn blood_pressure(mut self, value: impl Into<Value>) -> Self {
        self.blood_pressure = Some(value.into());
        self
    }

    /// Set the raw temperature value.
    #[must_use]
    pub fn temperature(mut self, value: impl Into<Value>) -> Self {
        self.temperature = Some(value.into());
        self
    }

    /// Set the raw age value.
    #[must_use]
    pub fn age(mut self, value: impl Into<Value>) -> Self {
        self.age = Some(value.into());
        self
    }

    /// Interpret the blood pressure field.
    pub fn blood_pressure_reading(&self) -> Reading<BloodPressure> {
        BloodPressure::from_raw(self.blood_pressure.as_ref())
    }

    /// Interpret the temperature field.
    pub fn temperature_reading(&self) -> Reading<f64> {
        Reading::numeric(self.temperature.as_ref())
    }

    /// Interpret the age field.
    pub fn age_reading(&self) -> Reading<f64> {
        Reading::numeric(self.age.as_ref())
    }
}

/// Accept string or numeric identifiers; anything else becomes empty.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
