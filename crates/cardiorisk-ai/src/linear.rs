//! Linear classifiers exported as JSON parameter files.
//!
//! A training pipeline writes the fitted coefficients of a logistic
//! regression or linear SVC, optionally with the standard scaler that
//! preceded it:
//!
//! ```json
//! {
//!   "model": "logistic_regression",
//!   "feature_names": ["age", "sex", "cp", "trestbps", "chol", "fbs", "restecg",
//!                     "thalach", "exang", "oldpeak", "slope", "ca", "thal"],
//!   "coefficients": [0.01, 0.9, 0.8, 0.01, 0.004, -0.1, 0.3, 0.02, -0.9, -0.6, 0.5, -0.8, -0.9],
//!   "intercept": -1.5,
//!   "classes": [0, 1],
//!   "scaler": { "mean": [...], "scale": [...] }
//! }
//! ```
//!
//! The class is `classes[1]` when the decision value is positive, otherwise
//! `classes[0]`. Only the logistic model has a probability estimate.

use cardiorisk_core::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ModelKind};
use crate::error::{InferenceError, SchemaMismatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LinearArtifact {
    LogisticRegression(LinearParams),
    LinearSvc(LinearParams),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

/// `(x - mean) / scale`, applied per feature before the linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// A validated linear model over the 13-feature schema.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    kind: ModelKind,
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
    classes: [i64; 2],
    scaler: Option<Scaler>,
}

#[derive(Debug, Clone)]
struct Scaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl LinearClassifier {
    /// Validate artifact parameters against the feature schema.
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, SchemaMismatch> {
        let (kind, params) = match artifact {
            LinearArtifact::LogisticRegression(p) => (ModelKind::LogisticRegression, p),
            LinearArtifact::LinearSvc(p) => (ModelKind::LinearSvc, p),
        };

        if params.feature_names != FEATURE_NAMES {
            return Err(SchemaMismatch(format!(
                "feature_names {:?} differ from the expected order {:?}",
                params.feature_names, FEATURE_NAMES
            )));
        }

        let weights = finite_row("coefficients", &params.coefficients)?;

        if !params.intercept.is_finite() {
            return Err(SchemaMismatch("intercept is not finite".into()));
        }

        let classes: [i64; 2] = params.classes.as_slice().try_into().map_err(|_| {
            SchemaMismatch(format!(
                "expected exactly 2 classes, found {}",
                params.classes.len()
            ))
        })?;

        let scaler = match params.scaler {
            Some(s) => {
                let mean = finite_row("scaler.mean", &s.mean)?;
                let scale = finite_row("scaler.scale", &s.scale)?;
                if scale.contains(&0.0) {
                    return Err(SchemaMismatch("scaler.scale contains zero".into()));
                }
                Some(Scaler { mean, scale })
            }
            None => None,
        };

        Ok(Self {
            kind,
            weights,
            intercept: params.intercept,
            classes,
            scaler,
        })
    }

    /// Signed distance from the separating hyperplane.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        let x = features.as_array();
        let mut sum = self.intercept;
        for i in 0..FEATURE_COUNT {
            let v = match &self.scaler {
                Some(s) => (x[i] - s.mean[i]) / s.scale[i],
                None => x[i],
            };
            sum += self.weights[i] * v;
        }
        sum
    }
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn supports_probability(&self) -> bool {
        self.kind == ModelKind::LogisticRegression
    }

    fn predict_class(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        let positive = self.decision_function(features) > 0.0;
        Ok(self.classes[usize::from(positive)])
    }

    fn positive_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<Option<f64>, InferenceError> {
        if !self.supports_probability() {
            return Ok(None);
        }
        Ok(Some(sigmoid(self.decision_function(features))))
    }
}

fn finite_row(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], SchemaMismatch> {
    let row: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        SchemaMismatch(format!(
            "{name} has {} values, expected {FEATURE_COUNT}",
            values.len()
        ))
    })?;
    if let Some(i) = row.iter().position(|v| !v.is_finite()) {
        return Err(SchemaMismatch(format!(
            "{name}[{i}] ({}) is not finite",
            FEATURE_NAMES[i]
        )));
    }
    Ok(row)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
