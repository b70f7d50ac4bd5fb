//! Inference layer: classifier artifacts, the shared model handle, and the prediction service.

mod artifact;
mod classifier;
mod error;
mod handle;
mod linear;
#[cfg(feature = "onnx")]
mod onnx;
mod pipeline;
mod service;
#[cfg(test)]
mod test_support;

pub use artifact::{ArtifactLoader, ModelInfo, ModelLoader, load_linear};
pub use classifier::{Classifier, ModelKind, RawPrediction, classify};
pub use error::{InferenceError, LoadError, PredictError, SchemaMismatch};
pub use handle::{ModelHandle, ModelState};
pub use linear::{LinearArtifact, LinearClassifier, LinearParams, StandardScaler};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use pipeline::{Assessment, RiskError, RiskPredictor};
pub use service::InferenceService;
