//! Per-signal risk scoring.
//!
//! Each signal scores independently. An unusable reading scores zero and is
//! flagged as a data-quality issue; it never aborts scoring of the others.

use serde::{Deserialize, Serialize};

use crate::reading::{BloodPressure, Reading};

/// Lowest temperature (°F) that counts as fever.
pub const FEVER_THRESHOLD: f64 = 99.6;
/// Lowest temperature (°F) that counts as high fever.
pub const HIGH_FEVER_THRESHOLD: f64 = 101.0;

/// Outcome of scoring one signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalScore {
    /// Risk points contributed.
    pub points: u32,
    /// Whether the underlying reading was missing or malformed.
    pub data_quality_issue: bool,
}

impl SignalScore {
    /// Score from a valid reading.
    pub fn valid(points: u32) -> Self {
        Self {
            points,
            data_quality_issue: false,
        }
    }

    /// Score for a missing or malformed reading.
    pub fn invalid() -> Self {
        Self {
            points: 0,
            data_quality_issue: true,
        }
    }
}

/// Blood pressure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    /// Systolic < 120 and diastolic < 80.
    Normal,
    /// Systolic 120–129 and diastolic < 80.
    Elevated,
    /// Systolic 130–139 or diastolic 80–89.
    Stage1,
    /// Systolic ≥ 140 or diastolic ≥ 90.
    Stage2,
    /// Falls between brackets (fractional values such as 129.5/75).
    Unclassified,
}

impl BloodPressureCategory {
    /// Categorize a reading. The more severe stage wins when both halves disagree.
    pub fn of(bp: &BloodPressure) -> Self {
        let (s, d) = (bp.systolic, bp.diastolic);
        if s >= 140.0 || d >= 90.0 {
            Self::Stage2
        } else if (130.0..=139.0).contains(&s) || (80.0..=89.0).contains(&d) {
            Self::Stage1
        } else if (120.0..=129.0).contains(&s) && d < 80.0 {
            Self::Elevated
        } else if s < 120.0 && d < 80.0 {
            Self::Normal
        } else {
            Self::Unclassified
        }
    }

    /// Risk points for this category.
    pub fn points(self) -> u32 {
        match self {
            Self::Normal | Self::Unclassified => 0,
            Self::Elevated => 1,
            Self::Stage1 => 2,
            Self::Stage2 => 3,
        }
    }
}

/// Score the blood pressure signal.
pub fn score_blood_pressure(reading: &Reading<BloodPressure>) -> SignalScore {
    match reading {
        Reading::Value(bp) => SignalScore::valid(BloodPressureCategory::of(bp).points()),
        Reading::Missing | Reading::Malformed(_) => SignalScore::invalid(),
    }
}

/// Score the temperature signal (°F).
pub fn score_temperature(reading: &Reading<f64>) -> SignalScore {
    match reading {
        Reading::Value(t) if *t >= HIGH_FEVER_THRESHOLD => SignalScore::valid(2),
        Reading::Value(t) if *t >= FEVER_THRESHOLD => SignalScore::valid(1),
        Reading::Value(_) => SignalScore::valid(0),
        Reading::Missing | Reading::Malformed(_) => SignalScore::invalid(),
    }
}

/// Score the age signal (years).
pub fn score_age(reading: &Reading<f64>) -> SignalScore {
    match reading {
        Reading::Value(a) if *a > 65.0 => SignalScore::valid(2),
        Reading::Value(a) if *a >= 40.0 => SignalScore::valid(1),
        Reading::Value(_) => SignalScore::valid(0),
        Reading::Missing | Reading::Malformed(_) => SignalScore::invalid(),
    }
}

/// Whether a temperature reading indicates fever.
///
/// Looks only at the reading itself, not at any score derived from it.
pub fn is_fever(reading: &Reading<f64>) -> bool {
    matches!(reading, Reading::Value(t) if *t >= FEVER_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(119.0, 79.0, 0)]
    #[case(120.0, 79.0, 1)]
    #[case(129.0, 79.0, 1)]
    #[case(130.0, 79.0, 2)]
    #[case(139.0, 89.0, 2)]
    #[case(110.0, 80.0, 2)]
    #[case(140.0, 79.0, 3)]
    #[case(115.0, 90.0, 3)]
    #[case(135.0, 95.0, 3)]
    #[case(150.0, 85.0, 3)]
    #[case(129.5, 75.0, 0)]
    fn test_blood_pressure_brackets(#[case] s: f64, #[case] d: f64, #[case] points: u32) {
        let reading = Reading::Value(BloodPressure::new(s, d));
        assert_eq!(score_blood_pressure(&reading), SignalScore::valid(points));
    }

    #[test]
    fn test_blood_pressure_categories() {
        assert_eq!(
            BloodPressureCategory::of(&BloodPressure::new(120.0, 80.0)),
            BloodPressureCategory::Stage1
        );
        assert_eq!(
            BloodPressureCategory::of(&BloodPressure::new(118.0, 70.0)),
            BloodPressureCategory::Normal
        );
        assert_eq!(
            BloodPressureCategory::of(&BloodPressure::new(129.5, 75.0)),
            BloodPressureCategory::Unclassified
        );
    }

    #[rstest]
    #[case(96.0, 0)]
    #[case(99.5, 0)]
    #[case(99.6, 1)]
    #[case(100.9, 1)]
    #[case(101.0, 2)]
    #[case(104.2, 2)]
    fn test_temperature_brackets(#[case] t: f64, #[case] points: u32) {
        assert_eq!(score_temperature(&Reading::Value(t)), SignalScore::valid(points));
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(39.0, 0)]
    #[case(40.0, 1)]
    #[case(65.0, 1)]
    #[case(66.0, 2)]
    #[case(90.0, 2)]
    fn test_age_brackets(#[case] a: f64, #[case] points: u32) {
        assert_eq!(score_age(&Reading::Value(a)), SignalScore::valid(points));
    }

    #[test]
    fn test_invalid_readings_score_zero() {
        assert_eq!(score_blood_pressure(&Reading::Missing), SignalScore::invalid());
        assert_eq!(
            score_blood_pressure(&Reading::Malformed("150/".into())),
            SignalScore::invalid()
        );
        assert_eq!(score_temperature(&Reading::Missing), SignalScore::invalid());
        assert_eq!(
            score_age(&Reading::Malformed("fifty-three".into())),
            SignalScore::invalid()
        );
    }

    #[test]
    fn test_fever() {
        assert!(!is_fever(&Reading::Value(99.5)));
        assert!(is_fever(&Reading::Value(99.6)));
        assert!(is_fever(&Reading::Value(99.7)));
        assert!(!is_fever(&Reading::Missing));
        assert!(!is_fever(&Reading::Malformed("abc".into())));
    }
}
