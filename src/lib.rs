//! Bank-account ownership prediction from survey form answers.
//!
//! A form front end hands a [`features::RawInput`] to a [`predictor::Predictor`], which encodes
//! the categorical answers, lays them out in training order, scores them with a pre-trained
//! classifier and renders the outcome sentence.

/// Application directory resolution.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// Category tables and label encoding.
pub mod encoding;
/// Raw form input and feature-vector assembly.
pub mod features;
/// Tracing subscriber setup.
pub mod logging;
/// Classifier artifacts.
pub mod ml;
/// Outcome sentences and prediction results.
pub mod outcome;
/// Model loading and the prediction pipeline.
pub mod predictor;

pub use encoding::{DomainMismatch, Field, encode};
pub use features::{FeatureVector, RawInput, assemble};
pub use outcome::{Language, Outcome, PredictionResult, format};
pub use predictor::{Loader, ModelHandle, PredictError, Predictor, load_model};
