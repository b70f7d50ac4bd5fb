//! Fixtures shared by the unit tests in this crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cardiorisk_core::{FeatureVector, RawPatientInput, assemble};

use crate::artifact::ModelLoader;
use crate::classifier::{Classifier, ModelKind};
use crate::error::{InferenceError, LoadError};

/// The reference submission: 45-year-old male, non-anginal pain.
pub fn sample_input() -> RawPatientInput {
    RawPatientInput {
        age: 45.0,
        sex: "Male".into(),
        cp: 2.into(),
        trestbps: 130.0,
        chol: 250.0,
        fbs: 0.into(),
        restecg: 1.into(),
        thalach: 150.0,
        exang: 0.into(),
        oldpeak: 1.5,
        slope: 1.into(),
        ca: 0.into(),
        thal: 2.into(),
    }
}

pub fn sample_features() -> FeatureVector {
    assemble(&sample_input()).unwrap()
}

/// A linear artifact with small coefficients; `intercept` decides the sign.
pub fn linear_json(model: &str, intercept: f64) -> String {
    format!(
        r#"{{
    "model": "{model}",
    "feature_names": ["age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak", "slope", "ca", "thal"],
    "coefficients": [0.01, 0.5, 0.4, 0.005, 0.002, 0.1, 0.2, -0.01, 0.6, 0.3, 0.2, 0.5, 0.3],
    "intercept": {intercept},
    "classes": [0, 1]
}}"#
    )
}

pub fn write_artifact(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Fixed output regardless of input.
#[derive(Debug)]
pub struct StubClassifier {
    class: i64,
    probability: Option<f64>,
}

impl StubClassifier {
    pub fn new(class: i64, probability: Option<f64>) -> Self {
        Self { class, probability }
    }
}

impl Classifier for StubClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::LogisticRegression
    }

    fn supports_probability(&self) -> bool {
        self.probability.is_some()
    }

    fn predict_class(&self, _features: &FeatureVector) -> Result<i64, InferenceError> {
        Ok(self.class)
    }

    fn positive_probability(
        &self,
        _features: &FeatureVector,
    ) -> Result<Option<f64>, InferenceError> {
        Ok(self.probability)
    }
}

/// What a [`CountingLoader`] does on its n-th call (zero-based).
pub type Script = dyn Fn(usize) -> Result<Arc<dyn Classifier>, LoadError> + Send + Sync;

/// Loader that counts calls, optionally sleeps, then runs a script.
pub struct CountingLoader {
    calls: Arc<AtomicUsize>,
    delay: Duration,
    script: Box<Script>,
}

impl CountingLoader {
    pub fn new(
        delay: Duration,
        script: impl Fn(usize) -> Result<Arc<dyn Classifier>, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
            script: Box::new(script),
        }
    }

    /// Always succeeds with a class-1 classifier at probability 0.8.
    pub fn ok(delay: Duration) -> Self {
        Self::new(delay, |_| Ok(Arc::new(StubClassifier::new(1, Some(0.8)))))
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ModelLoader for CountingLoader {
    fn source(&self) -> String {
        "test loader".into()
    }

    fn load(&self) -> Result<Arc<dyn Classifier>, LoadError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        (self.script)(n)
    }
}

pub fn io_failure() -> LoadError {
    LoadError::Io {
        path: PathBuf::from("missing.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}
