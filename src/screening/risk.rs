//! Risk classifier — fixed probability thresholds to ordinal risk bands.

use super::ScreeningError;
use crate::models::RiskLevel;

/// Map a model probability to a risk band.
///
/// - p ≥ 0.7 → High
/// - 0.4 ≤ p < 0.7 → Medium
/// - p < 0.4 → Low
///
/// The predictor is trusted to return a valid probability, but an
/// out-of-range value must not be silently mis-banded: it fails instead,
/// so schema drift in the scoring service is caught immediately.
pub fn classify(probability: f64) -> Result<RiskLevel, ScreeningError> {
    if probability.is_nan() || !(0.0..=1.0).contains(&probability) {
        return Err(ScreeningError::InvalidInput(format!(
            "probability must be in [0,1], got {probability}"
        )));
    }

    if probability >= 0.7 {
        Ok(RiskLevel::High)
    } else if probability >= 0.4 {
        Ok(RiskLevel::Medium)
    } else {
        Ok(RiskLevel::Low)
    }
}
