//! Model loading and the encode → assemble → score → format pipeline.
//!
//! The model artifact is loaded at most once per [`Predictor`]. Concurrent callers that arrive
//! during a cold start wait on the load lock and then observe the single handle that was stored.
//! A failed load stores nothing, so a later call retries once the artifact is in place.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::encoding::DomainMismatch;
use crate::features::{FeatureVector, RawInput, assemble};
use crate::ml::{ModelArtifact, ModelError};
use crate::outcome::{Language, Outcome, PredictionResult};

/// Errors surfaced by model loading and prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    /// No model artifact exists at the configured path.
    #[error(
        "Model file {path} was not found. Place the trained model there or set model_path / --model to its location."
    )]
    ModelNotFound { path: PathBuf },
    /// The artifact exists but could not be read or is not a valid model.
    #[error("Model at {path} could not be loaded: {source}")]
    InvalidModel { path: PathBuf, source: ModelError },
    /// A form label fell outside its field's closed set.
    #[error("Form value rejected: {0}")]
    Domain(#[from] DomainMismatch),
    /// The model failed to score the feature vector.
    #[error("Scoring failed: {0}")]
    Scoring(ModelError),
}

/// Shared, read-only reference to a loaded model.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    model: Arc<ModelArtifact>,
    path: PathBuf,
}

impl ModelHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    /// Positive-class probability and the label it maps to, from a single pass.
    pub fn score(&self, features: &FeatureVector) -> Result<(f32, u8), PredictError> {
        self.model
            .score(features.as_slice())
            .map_err(PredictError::Scoring)
    }

    /// True when both handles point at the same loaded artifact.
    pub fn same_model(&self, other: &ModelHandle) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }

    /// Positive-class probability for one feature vector.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f32, PredictError> {
        self.model
            .predict_proba(features.as_slice())
            .map_err(PredictError::Scoring)
    }

    /// Binary label (`0` or `1`) for one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<u8, PredictError> {
        self.model
            .predict_label(features.as_slice())
            .map_err(PredictError::Scoring)
    }
}

/// Load a model artifact from `path`.
pub fn load_model(path: &Path) -> Result<ModelHandle, PredictError> {
    if !path.is_file() {
        warn!("Model artifact missing at {}", path.display());
        return Err(PredictError::ModelNotFound {
            path: path.to_path_buf(),
        });
    }
    let model = ModelArtifact::load_json(path).map_err(|source| match source {
        ModelError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            PredictError::ModelNotFound {
                path: path.to_path_buf(),
            }
        }
        source => PredictError::InvalidModel {
            path: path.to_path_buf(),
            source,
        },
    })?;
    info!(
        kind = model.kind(),
        feature_len = model.feature_len(),
        "Loaded model from {}",
        path.display()
    );
    Ok(ModelHandle {
        model: Arc::new(model),
        path: path.to_path_buf(),
    })
}

/// Function that turns a model path into a handle. [`load_model`] unless overridden.
pub type Loader = fn(&Path) -> Result<ModelHandle, PredictError>;

/// Entry point used by the form front end.
#[derive(Debug)]
pub struct Predictor {
    model_path: PathBuf,
    language: Language,
    loader: Loader,
    handle: OnceLock<ModelHandle>,
    load_lock: Mutex<()>,
}

impl Predictor {
    pub fn new(model_path: impl Into<PathBuf>, language: Language) -> Self {
        Self::with_loader(model_path, language, load_model)
    }

    /// Build a predictor that loads its model through `loader`.
    pub fn with_loader(
        model_path: impl Into<PathBuf>,
        language: Language,
        loader: Loader,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            language,
            loader,
            handle: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.model_path.clone(), config.language)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Load the model if it is not loaded yet and return the cached handle.
    pub fn ensure_loaded(&self) -> Result<&ModelHandle, PredictError> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle);
        }
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = self.handle.get() {
            return Ok(handle);
        }
        let handle = (self.loader)(&self.model_path)?;
        Ok(self.handle.get_or_init(|| handle))
    }

    pub fn is_model_ready(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Encode, assemble, score and render one form submission.
    pub fn predict(&self, raw: &RawInput) -> Result<PredictionResult, PredictError> {
        let handle = self.ensure_loaded()?;
        let features = assemble(raw)?;
        let (probability, label) = handle.score(&features)?;
        let outcome = Outcome::from_label(label);
        debug!(probability, label, "Scored submission");
        Ok(PredictionResult::new(outcome, probability, self.language))
    }
}
