//! ONNX Runtime backend for classifiers exported from a training pipeline.
//!
//! Expects a float input of shape `[1, 13]`. The first output is the int64
//! class label. A second tensor output, when present, is the `[1, 2]`
//! probability matrix (exported without ZipMap); models without it have no
//! probability estimate.

use std::fmt;
use std::path::Path;

use cardiorisk_core::{FEATURE_COUNT, FeatureVector};
use ort::session::Session;
use ort::value::{Tensor, ValueType};
use parking_lot::Mutex;
use tracing::info;

use crate::classifier::{Classifier, ModelKind, RawPrediction};
use crate::error::{InferenceError, LoadError, SchemaMismatch};

pub struct OnnxClassifier {
    // Session::run needs exclusive access.
    session: Mutex<Session>,
    input_name: String,
    has_probabilities: bool,
}

impl fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("has_probabilities", &self.has_probabilities)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let runtime_err = |e: ort::Error| LoadError::Onnx {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let schema_err = |reason: String| LoadError::Schema {
            path: path.to_path_buf(),
            source: SchemaMismatch(reason),
        };

        let session = Session::builder()
            .map_err(runtime_err)?
            .commit_from_file(path)
            .map_err(runtime_err)?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| schema_err("model has no inputs".into()))?;
        let input_name = input.name().to_string();
        if let Some(width) = tensor_width(input.dtype())
            && width != FEATURE_COUNT
        {
            return Err(schema_err(format!(
                "input {input_name:?} takes {width} features, expected {FEATURE_COUNT}"
            )));
        }

        if session.outputs().is_empty() {
            return Err(schema_err("model has no outputs".into()));
        }
        let has_probabilities = session
            .outputs()
            .get(1)
            .is_some_and(|o| matches!(o.dtype(), ValueType::Tensor { .. }));

        info!(
            model = %path.display(),
            input = %input_name,
            has_probabilities,
            "loaded ONNX classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            has_probabilities,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Onnx
    }

    fn supports_probability(&self) -> bool {
        self.has_probabilities
    }

    fn predict_class(&self, features: &FeatureVector) -> Result<i64, InferenceError> {
        Ok(self.predict(features)?.class)
    }

    fn positive_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<Option<f64>, InferenceError> {
        if !self.has_probabilities {
            return Ok(None);
        }
        Ok(self.predict(features)?.positive_probability)
    }

    fn predict(&self, features: &FeatureVector) -> Result<RawPrediction, InferenceError> {
        let row = features.to_f32();
        let shape = [1i64, FEATURE_COUNT as i64];
        let tensor = Tensor::from_array((shape, row.to_vec().into_boxed_slice())).map_err(runtime)?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(runtime)?;

        let (_, labels) = outputs[0].try_extract_tensor::<i64>().map_err(runtime)?;
        let class = *labels
            .first()
            .ok_or_else(|| InferenceError::MalformedOutput("empty label output".into()))?;

        let positive_probability = if self.has_probabilities {
            let (_, probs) = outputs[1].try_extract_tensor::<f32>().map_err(runtime)?;
            let p = probs.get(1).ok_or_else(|| {
                InferenceError::MalformedOutput(format!(
                    "probability output has {} values, expected 2",
                    probs.len()
                ))
            })?;
            Some(f64::from(*p))
        } else {
            None
        };

        Ok(RawPrediction {
            class,
            positive_probability,
        })
    }
}

fn runtime(e: ort::Error) -> InferenceError {
    InferenceError::Onnx(e.to_string())
}

/// Last dimension of a tensor input, when the model fixes it.
fn tensor_width(value_type: &ValueType) -> Option<usize> {
    match value_type {
        ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
