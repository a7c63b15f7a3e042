use serde::Serialize;

/// How close a simulated lap is to the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyRating {
    /// Within 5 %.
    Excellent,
    /// Within 10 %.
    Good,
    NeedsWork,
}

impl AccuracyRating {
    pub fn from_error_percent(error_percent: f64) -> Self {
        let error = error_percent.abs();
        if error < 5.0 {
            AccuracyRating::Excellent
        } else if error < 10.0 {
            AccuracyRating::Good
        } else {
            AccuracyRating::NeedsWork
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationReport {
    pub simulated: f64,
    pub reference: f64,
    /// `simulated - reference` (s); positive when the simulation is slower.
    pub difference: f64,
    pub error_percent: f64,
    pub rating: AccuracyRating,
}

/// Compares a simulated lap time with a reference time, both in seconds.
/// `reference` must be positive; tracks only carry validated records.
pub fn validate_against_record(simulated: f64, reference: f64) -> ValidationReport {
    let difference = simulated - reference;
    let error_percent = difference / reference * 100.0;
    ValidationReport {
        simulated,
        reference,
        difference,
        error_percent,
        rating: AccuracyRating::from_error_percent(error_percent),
    }
}
