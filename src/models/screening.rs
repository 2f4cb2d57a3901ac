//! Screening entities: patient-entered input, the persisted record,
//! and the summary/aggregate shapes served to clients.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Gender, ResidenceType, RiskLevel, SmokingStatus, WorkType};

/// Raw patient-entered values for one screening. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningInput {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub ever_married: bool,
    pub work_type: WorkType,
    pub residence_type: ResidenceType,
    pub avg_glucose_level: f64,
    pub smoking_status: SmokingStatus,
}

impl ScreeningInput {
    /// Range validation matching the intake form's limits.
    pub fn validate(&self) -> Result<(), String> {
        if !(50.0..=250.0).contains(&self.height_cm) {
            return Err(format!(
                "height_cm must be between 50 and 250, got {}",
                self.height_cm
            ));
        }
        if !(20.0..=300.0).contains(&self.weight_kg) {
            return Err(format!(
                "weight_kg must be between 20 and 300, got {}",
                self.weight_kg
            ));
        }
        if !(50.0..=400.0).contains(&self.avg_glucose_level) {
            return Err(format!(
                "avg_glucose_level must be between 50 and 400, got {}",
                self.avg_glucose_level
            ));
        }
        Ok(())
    }
}

/// One completed screening: the input, the derived measures, and the
/// model's output. Created exactly once per successful screening call,
/// never updated.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age_at_screening: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub ever_married: bool,
    pub work_type: WorkType,
    pub residence_type: ResidenceType,
    pub avg_glucose_level: f64,
    pub smoking_status: SmokingStatus,
    pub stroke_probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub confidence: String,
    pub prediction: i32,
    pub threshold: f64,
    pub created_at: NaiveDateTime,
}

/// Compact row for screening history listings.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningSummary {
    pub id: Uuid,
    pub age_at_screening: i32,
    pub bmi: f64,
    pub risk_level: RiskLevel,
    pub stroke_probability: f64,
    pub created_at: NaiveDateTime,
}

/// Per-patient rollup for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub total_screenings: i64,
    pub last_screening_date: Option<NaiveDateTime>,
    pub highest_risk_level: Option<RiskLevel>,
}

/// Aggregate statistics for one risk band.
#[derive(Debug, Clone, Serialize)]
pub struct RiskLevelStats {
    pub risk_level: RiskLevel,
    pub total_count: i64,
    pub avg_age: f64,
    pub avg_bmi: f64,
    pub avg_glucose: f64,
    pub avg_probability: f64,
    pub hypertension_count: i64,
    pub heart_disease_count: i64,
}

/// Overview counters for the admin landing page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_patients: i64,
    pub total_screenings: i64,
    pub high_risk_count: i64,
    pub recent_screenings_7days: i64,
}

#[cfg(test)]
pub(crate) fn sample_input() -> ScreeningInput {
    ScreeningInput {
        height_cm: 170.0,
        weight_kg: 70.0,
        hypertension: false,
        heart_disease: false,
        ever_married: true,
        work_type: WorkType::Private,
        residence_type: ResidenceType::Urban,
        avg_glucose_level: 95.0,
        smoking_status: SmokingStatus::NeverSmoked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_input_passes() {
        assert!(sample_input().validate().is_ok());
    }

    #[test]
    fn height_out_of_range_rejected() {
        let mut input = sample_input();
        input.height_cm = 40.0;
        assert!(input.validate().is_err());
        input.height_cm = 251.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn weight_out_of_range_rejected() {
        let mut input = sample_input();
        input.weight_kg = 19.9;
        assert!(input.validate().is_err());
    }

    #[test]
    fn glucose_out_of_range_rejected() {
        let mut input = sample_input();
        input.avg_glucose_level = 420.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut input = sample_input();
        input.height_cm = 50.0;
        input.weight_kg = 300.0;
        input.avg_glucose_level = 400.0;
        assert!(input.validate().is_ok());
    }
}
