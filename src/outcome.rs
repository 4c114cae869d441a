//! Human-readable rendering of a classifier label.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary classifier decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    NotLikely = 0,
    Likely = 1,
}

impl Outcome {
    /// Map a classifier label. Any non-zero label is the positive class.
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            Outcome::NotLikely
        } else {
            Outcome::Likely
        }
    }

    pub fn label(self) -> u8 {
        self as u8
    }

    /// Sentence describing this outcome in `language`.
    pub fn sentence(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::En, Outcome::Likely) => "the person is likely to have a bank account",
            (Language::En, Outcome::NotLikely) => {
                "the person is not likely to have a bank account"
            }
            (Language::Fr, Outcome::Likely) => {
                "la personne est susceptible d'avoir un compte bancaire"
            }
            (Language::Fr, Outcome::NotLikely) => {
                "la personne n'est pas susceptible d'avoir un compte bancaire"
            }
        }
    }
}

/// Output language for outcome sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "fr" | "french" | "français" => Some(Language::Fr),
            _ => None,
        }
    }
}

/// Render a classifier label as the English outcome sentence.
pub fn format(label: u8) -> &'static str {
    Outcome::from_label(label).sentence(Language::En)
}

/// Result of one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub outcome: Outcome,
    /// Positive-class probability reported by the model.
    pub probability: f32,
    pub message: &'static str,
}

impl PredictionResult {
    pub fn new(outcome: Outcome, probability: f32, language: Language) -> Self {
        Self {
            outcome,
            probability,
            message: outcome.sentence(language),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.outcome == Outcome::Likely
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}
