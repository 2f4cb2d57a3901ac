//! Screening computation pipeline: age/BMI derivation, feature encoding,
//! model invocation, risk banding, and record assembly.

pub mod encoder;
pub mod orchestrator;
pub mod risk;

pub use orchestrator::run_screening;

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::db::DatabaseError;
use crate::predictor::PredictorError;

/// Errors from the screening pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    /// Malformed or out-of-range input. Caller error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Model not loaded — fails before any side effect.
    #[error("Prediction model is not available")]
    PredictorUnavailable,
    /// Scoring failed. Internal, not retried.
    #[error("Prediction failed: {0}")]
    PredictorRuntime(String),
    /// Persistence failed after a successful prediction.
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

impl From<PredictorError> for ScreeningError {
    fn from(err: PredictorError) -> Self {
        match err {
            PredictorError::Unavailable => ScreeningError::PredictorUnavailable,
            PredictorError::Runtime(detail) => ScreeningError::PredictorRuntime(detail),
        }
    }
}

/// Time source for age computation and record timestamps.
/// Injected so the pipeline is testable against fixed dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in UTC.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Clock pinned to a fixed date for deterministic age tests.
    pub struct FixedClock(pub NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }

        fn now(&self) -> NaiveDateTime {
            self.0.and_hms_opt(12, 0, 0).unwrap()
        }
    }
}
