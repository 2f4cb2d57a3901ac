//! HTTP adapter for the model-serving process.
//!
//! The trained classifier runs in a separate scoring service; this client
//! POSTs the encoded feature vector to `/predict` and parses the scoring
//! response. Connection-level failures mean the model is effectively not
//! loaded (`Unavailable`); anything the service itself reports as a scoring
//! problem is `Runtime`.

use serde::Deserialize;

use super::{PredictionResult, Predictor, PredictorError};
use crate::screening::encoder::FeatureVector;

pub struct HttpPredictor {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpPredictor {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PredictorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PredictorError::Runtime(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Probe the scoring service. Used at startup to log whether the
    /// model is reachable; a failed probe does not prevent startup,
    /// requests will surface 503 until the service comes up.
    pub fn health_check(&self) -> Result<(), PredictorError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .map_err(|_| PredictorError::Unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PredictorError::Unavailable)
        }
    }
}

/// Error body the scoring service returns on a failed prediction.
#[derive(Deserialize)]
struct ScoringErrorBody {
    detail: Option<String>,
}

impl Predictor for HttpPredictor {
    fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult, PredictorError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(vector)
            .send()
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    PredictorError::Unavailable
                } else {
                    PredictorError::Runtime(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(PredictorError::Unavailable);
        }
        if !status.is_success() {
            let detail = response
                .json::<ScoringErrorBody>()
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or_else(|| format!("scoring service returned {status}"));
            return Err(PredictorError::Runtime(detail));
        }

        let result: PredictionResult = response
            .json()
            .map_err(|e| PredictorError::Runtime(format!("invalid scoring response: {e}")))?;

        if !(0.0..=1.0).contains(&result.probability) || result.probability.is_nan() {
            return Err(PredictorError::Runtime(format!(
                "scoring service returned probability outside [0,1]: {}",
                result.probability
            )));
        }

        Ok(result)
    }
}
