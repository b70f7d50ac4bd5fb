//! The classifier seam: what every loaded artifact must provide, and how its
//! raw output becomes a [`ClassificationResult`].

use std::fmt;

use cardiorisk_core::{ClassificationResult, Confidence, DiseaseLabel, FeatureVector};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::InferenceError;

/// Which backend a loaded classifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    LinearSvc,
    Onnx,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "logistic_regression",
            Self::LinearSvc => "linear_svc",
            Self::Onnx => "onnx",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class value and positive-class probability straight from a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPrediction {
    pub class: i64,
    pub positive_probability: Option<f64>,
}

/// A fitted, read-only binary classifier over the 13-feature schema.
///
/// Implementations are shared across threads after loading and must not
/// mutate observable state in `predict_class` or `positive_probability`.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn kind(&self) -> ModelKind;

    /// Whether [`Classifier::positive_probability`] can return a value.
    fn supports_probability(&self) -> bool;

    /// Deterministic class prediction.
    fn predict_class(&self, features: &FeatureVector) -> Result<i64, InferenceError>;

    /// Probability of the positive class, or `Ok(None)` when the model has
    /// no probability estimate.
    fn positive_probability(&self, features: &FeatureVector)
    -> Result<Option<f64>, InferenceError>;

    /// Class and probability together. Backends that produce both in one
    /// pass override this.
    fn predict(&self, features: &FeatureVector) -> Result<RawPrediction, InferenceError> {
        Ok(RawPrediction {
            class: self.predict_class(features)?,
            positive_probability: self.positive_probability(features)?,
        })
    }
}

/// Run a classifier and map its output to a [`ClassificationResult`].
///
/// Class 0 is no-disease and anything else is disease. A probability
/// outside `[0, 1]` is an error, never clamped.
pub fn classify(
    classifier: &dyn Classifier,
    features: &FeatureVector,
) -> Result<ClassificationResult, InferenceError> {
    let raw = classifier.predict(features)?;

    if !matches!(raw.class, 0 | 1) {
        warn!(
            class = raw.class,
            kind = %classifier.kind(),
            "classifier returned a non-binary class, reporting disease"
        );
    }

    let label = DiseaseLabel::from_class(raw.class);
    let confidence = raw
        .positive_probability
        .map(Confidence::new)
        .transpose()?;

    debug!(
        label = label.as_str(),
        confidence = confidence.map(Confidence::value),
        "prediction"
    );

    Ok(ClassificationResult { label, confidence })
}
