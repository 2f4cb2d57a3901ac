//! Predictor port — the trained stroke model consumed as an opaque
//! scoring function.
//!
//! The screening orchestrator only depends on the `Predictor` trait;
//! production uses `HttpPredictor` against the model-serving process,
//! tests use stubs.

pub mod http;

use serde::{Deserialize, Serialize};

use crate::screening::encoder::FeatureVector;

/// Output of one model invocation. Opaque to the core except for the
/// named fields, which are copied into the screening record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Stroke probability in [0,1].
    pub probability: f64,
    /// Binary prediction at the model's decision threshold.
    pub prediction: i32,
    /// Model-reported confidence label.
    pub confidence: String,
    /// Contributing risk factor names, ordered by weight.
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// Decision threshold the model applied.
    pub threshold: f64,
}

/// Errors from the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    /// Model not loaded / scoring service unreachable. Retryable after
    /// operator intervention; surfaced as 503.
    #[error("Prediction model is not available")]
    Unavailable,
    /// Scoring itself failed. Treated as internal, not retried.
    #[error("Prediction failed: {0}")]
    Runtime(String),
}

/// Scoring function over the fixed 16-field feature vector.
pub trait Predictor: Send + Sync {
    fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, PredictorError>;
}
