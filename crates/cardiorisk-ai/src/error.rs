use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cardiorisk_core::InvalidProbability;
use thiserror::Error;

/// Artifact metadata or parameters disagree with the feature schema.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SchemaMismatch(pub String);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse model artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("model artifact {} does not match the feature schema: {source}", path.display())]
    Schema {
        path: PathBuf,
        source: SchemaMismatch,
    },

    #[error("unsupported model artifact {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: &'static str },

    #[cfg(feature = "onnx")]
    #[error("ONNX runtime rejected {}: {message}", path.display())]
    Onnx { path: PathBuf, message: String },

    #[error("model did not finish loading within {0:?}")]
    Timeout(Duration),

    #[error("model loader panicked: {0}")]
    Panicked(String),

    #[error("cannot start model loader thread: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    InvalidProbability(#[from] InvalidProbability),

    #[error("malformed classifier output: {0}")]
    MalformedOutput(String),

    #[cfg(feature = "onnx")]
    #[error("ONNX runtime error: {0}")]
    Onnx(String),
}

/// Failure of a single `predict` call.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Shared with every caller that waited on the same load.
    #[error(transparent)]
    Load(#[from] Arc<LoadError>),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
