//! Feature encoder — maps patient-facing values into the model's fixed
//! numeric feature vector.
//!
//! The serialized field names and their order must match the trained
//! model's column layout byte-for-byte (including the capitalized
//! `Residence_type`). A reordered or renamed field does not error — it
//! silently misfeeds the model — so the layout lives in exactly one place:
//! this struct.

use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate};

use super::ScreeningError;
use crate::models::{Gender, ResidenceType, ScreeningInput, SmokingStatus, WorkType};

/// The model's input schema: 16 numeric columns in training order.
///
/// Invariant: the five `work_type_*` fields sum to exactly 1, and the four
/// `smoking_status_*` fields sum to exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)] // field names mirror the training columns exactly
pub struct FeatureVector {
    pub age: f64,
    /// Male = 1, Female = 0.
    pub gender: f64,
    pub hypertension: f64,
    pub heart_disease: f64,
    pub ever_married: f64,
    /// Urban = 1, Rural = 0. Capitalized in the training data.
    #[serde(rename = "Residence_type")]
    pub residence_type: f64,
    pub avg_glucose_level: f64,
    pub bmi: f64,
    pub work_type_Govt_job: f64,
    pub work_type_Never_worked: f64,
    pub work_type_Private: f64,
    pub work_type_Self_employed: f64,
    pub work_type_children: f64,
    pub smoking_status_Unknown: f64,
    pub smoking_status_formerly_smoked: f64,
    pub smoking_status_never_smoked: f64,
    pub smoking_status_smokes: f64,
}

/// Integer age at `today` given a date of birth, with the month/day
/// correction (birthday not yet reached this year subtracts 1).
/// Correct irrespective of leap years.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// BMI from height/weight, rounded to 1 decimal place.
///
/// Upstream range validation (50-250 cm) makes the zero-height branch
/// unreachable in normal operation; the guard protects the division.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<f64, ScreeningError> {
    if height_cm <= 0.0 {
        return Err(ScreeningError::InvalidInput(format!(
            "height_cm must be positive, got {height_cm}"
        )));
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Ok((bmi * 10.0).round() / 10.0)
}

/// Encode one screening into the model's feature vector.
///
/// `gender` comes from the authenticated identity, `age` and `bmi` are the
/// derived measures. Each one-hot group sets exactly one indicator.
pub fn encode(input: &ScreeningInput, gender: Gender, age: i32, bmi: f64) -> FeatureVector {
    let work = one_hot_work_type(input.work_type);
    let smoking = one_hot_smoking_status(input.smoking_status);

    FeatureVector {
        age: f64::from(age),
        gender: match gender {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        },
        hypertension: f64::from(u8::from(input.hypertension)),
        heart_disease: f64::from(u8::from(input.heart_disease)),
        ever_married: f64::from(u8::from(input.ever_married)),
        residence_type: match input.residence_type {
            ResidenceType::Urban => 1.0,
            ResidenceType::Rural => 0.0,
        },
        avg_glucose_level: input.avg_glucose_level,
        bmi,
        work_type_Govt_job: work[0],
        work_type_Never_worked: work[1],
        work_type_Private: work[2],
        work_type_Self_employed: work[3],
        work_type_children: work[4],
        smoking_status_Unknown: smoking[0],
        smoking_status_formerly_smoked: smoking[1],
        smoking_status_never_smoked: smoking[2],
        smoking_status_smokes: smoking[3],
    }
}

/// One-hot columns in training order: Govt_job, Never_worked, Private,
/// Self_employed, children.
fn one_hot_work_type(work_type: WorkType) -> [f64; 5] {
    match work_type {
        WorkType::GovtJob => [1.0, 0.0, 0.0, 0.0, 0.0],
        WorkType::NeverWorked => [0.0, 1.0, 0.0, 0.0, 0.0],
        WorkType::Private => [0.0, 0.0, 1.0, 0.0, 0.0],
        WorkType::SelfEmployed => [0.0, 0.0, 0.0, 1.0, 0.0],
        WorkType::Children => [0.0, 0.0, 0.0, 0.0, 1.0],
    }
}

/// One-hot columns in training order: Unknown, formerly_smoked,
/// never_smoked, smokes.
fn one_hot_smoking_status(status: SmokingStatus) -> [f64; 4] {
    match status {
        SmokingStatus::Unknown => [1.0, 0.0, 0.0, 0.0],
        SmokingStatus::FormerlySmoked => [0.0, 1.0, 0.0, 0.0],
        SmokingStatus::NeverSmoked => [0.0, 0.0, 1.0, 0.0],
        SmokingStatus::Smokes => [0.0, 0.0, 0.0, 1.0],
    }
}
