//! Classification output handed back to the presentation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiseaseLabel {
    NoDisease,
    Disease,
}

impl DiseaseLabel {
    /// Class 0 is no-disease; every other class value is disease.
    pub fn from_class(class: i64) -> Self {
        if class == 0 {
            Self::NoDisease
        } else {
            Self::Disease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDisease => "no-disease",
            Self::Disease => "disease",
        }
    }

    pub fn is_disease(&self) -> bool {
        matches!(self, Self::Disease)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("probability {0} is outside [0, 1]")]
pub struct InvalidProbability(pub f64);

/// Positive-class probability, guaranteed finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(probability: f64) -> Result<Self, InvalidProbability> {
        if probability.is_finite() && (0.0..=1.0).contains(&probability) {
            Ok(Self(probability))
        } else {
            Err(InvalidProbability(probability))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Probability scaled to 0–100.
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = InvalidProbability;

    fn try_from(probability: f64) -> Result<Self, Self::Error> {
        Self::new(probability)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

/// Label plus optional confidence.
///
/// `confidence` is `None` when the classifier has no probability estimate;
/// it is never filled with a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: DiseaseLabel,
    pub confidence: Option<Confidence>,
}
