//! Screening orchestrator — runs the full pipeline for one request:
//! validate → derive age/BMI → encode → predict → classify → persist.
//!
//! Steps are strictly sequential; each depends on the previous one's
//! output. The store insert at the end is the only side effect, so any
//! earlier failure leaves nothing behind.

use rusqlite::Connection;

use super::{encoder, risk, Clock, ScreeningError};
use crate::db::repository::screening::{insert_screening, NewScreening};
use crate::models::{Identity, ScreeningInput, ScreeningRecord};
use crate::predictor::Predictor;

/// Run one screening for the authenticated patient.
///
/// Two calls with identical input produce two distinct records — a
/// screening is a new clinical event each time, never deduplicated.
pub fn run_screening(
    conn: &Connection,
    predictor: &dyn Predictor,
    clock: &dyn Clock,
    identity: &Identity,
    input: &ScreeningInput,
) -> Result<ScreeningRecord, ScreeningError> {
    input.validate().map_err(ScreeningError::InvalidInput)?;

    let age = encoder::calculate_age(identity.date_of_birth, clock.today());
    let bmi = encoder::calculate_bmi(input.height_cm, input.weight_kg)?;
    let vector = encoder::encode(input, identity.gender, age, bmi);

    let prediction = predictor.predict(&vector)?;
    let risk_level = risk::classify(prediction.probability)?;

    tracing::info!(
        user = %identity.email,
        probability = prediction.probability,
        risk = risk_level.as_str(),
        confidence = %prediction.confidence,
        "prediction made"
    );

    let draft = NewScreening {
        user_id: identity.id,
        age_at_screening: age,
        input: input.clone(),
        bmi,
        stroke_probability: prediction.probability,
        risk_level,
        risk_factors: prediction.risk_factors,
        confidence: prediction.confidence,
        prediction: prediction.prediction,
        threshold: prediction.threshold,
    };

    let record = insert_screening(conn, &draft, clock.now())?;
    tracing::info!(id = %record.id, "screening saved");
    Ok(record)
}
