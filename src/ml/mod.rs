//! Pre-trained classifier artifacts and their scoring functions.
//!
//! An artifact is a single JSON document tagged by `kind`. Both kinds produce a positive-class
//! probability that is compared against the artifact's decision threshold to yield a `{0, 1}`
//! label.

pub mod gbdt;
pub mod logreg;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gbdt::{GbdtModel, Node, Tree};
pub use logreg::LogRegModel;

/// Artifact format version understood by this build.
pub const MODEL_VERSION: i64 = 1;

/// Errors raised while loading or scoring a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("Failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The artifact is not valid JSON for any known kind.
    #[error("Invalid model JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The artifact parsed but violates a structural invariant.
    #[error("Invalid model: {0}")]
    Invalid(String),
    /// The artifact was written by an incompatible exporter.
    #[error("Unsupported model_version {found} (expected {expected})")]
    UnsupportedVersion { found: i64, expected: i64 },
    /// A feature vector of the wrong length was scored.
    #[error("Model expects {expected} features, got {actual}")]
    FeatureLen { expected: usize, actual: usize },
}

/// A trained binary classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Gbdt(GbdtModel),
    Logreg(LogRegModel),
}

impl ModelArtifact {
    /// Load and validate a model from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        let (version, threshold) = match self {
            ModelArtifact::Gbdt(model) => (model.model_version, model.threshold),
            ModelArtifact::Logreg(model) => (model.model_version, model.threshold),
        };
        if version != MODEL_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: version,
                expected: MODEL_VERSION,
            });
        }
        if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
            return Err(ModelError::Invalid(format!(
                "threshold {threshold} must lie strictly between 0 and 1"
            )));
        }
        match self {
            ModelArtifact::Gbdt(model) => model.validate(),
            ModelArtifact::Logreg(model) => model.validate(),
        }
    }

    /// Number of features the model was trained on.
    pub fn feature_len(&self) -> usize {
        match self {
            ModelArtifact::Gbdt(model) => model.feature_len,
            ModelArtifact::Logreg(model) => model.feature_len,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Gbdt(_) => "gbdt",
            ModelArtifact::Logreg(_) => "logreg",
        }
    }

    /// Positive-class probability for a single row.
    pub fn predict_proba(&self, features: &[f32]) -> Result<f32, ModelError> {
        let expected = self.feature_len();
        if features.len() != expected {
            return Err(ModelError::FeatureLen {
                expected,
                actual: features.len(),
            });
        }
        let margin = match self {
            ModelArtifact::Gbdt(model) => model.predict_margin(features),
            ModelArtifact::Logreg(model) => model.predict_margin(features),
        };
        Ok(sigmoid(margin))
    }

    /// Binary class label for a single row.
    pub fn predict_label(&self, features: &[f32]) -> Result<u8, ModelError> {
        self.score(features).map(|(_, label)| label)
    }

    /// Positive-class probability and its thresholded label.
    pub fn score(&self, features: &[f32]) -> Result<(f32, u8), ModelError> {
        let proba = self.predict_proba(features)?;
        Ok((proba, u8::from(proba >= self.threshold())))
    }

    pub fn threshold(&self) -> f32 {
        match self {
            ModelArtifact::Gbdt(model) => model.threshold,
            ModelArtifact::Logreg(model) => model.threshold,
        }
    }
}

/// Logistic link used by both model kinds.
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn default_threshold() -> f32 {
    0.5
}
