//! Logistic regression over the raw feature vector.

use serde::{Deserialize, Serialize};

use crate::ml::ModelError;

/// Binary logistic regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRegModel {
    pub model_version: i64,
    pub feature_len: usize,
    pub weights: Vec<f32>,
    pub bias: f32,
    #[serde(default = "crate::ml::default_threshold")]
    pub threshold: f32,
}

impl LogRegModel {
    /// Validate the model dimensions.
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.feature_len == 0 {
            return Err(ModelError::Invalid("feature_len must be > 0".to_string()));
        }
        if self.weights.len() != self.feature_len {
            return Err(ModelError::Invalid(format!(
                "weights length {} does not match feature_len {}",
                self.weights.len(),
                self.feature_len
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Invalid(
                "weights and bias must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Linear score (log-odds) for a feature vector.
    pub fn predict_margin(&self, features: &[f32]) -> f32 {
        self.weights
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x)
    }
}
