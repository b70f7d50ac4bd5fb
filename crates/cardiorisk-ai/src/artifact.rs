//! Reading classifier artifacts from disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::classifier::{Classifier, ModelKind};
use crate::error::LoadError;
use crate::linear::{LinearArtifact, LinearClassifier};

/// Produces a classifier. Called at most once per load or reload.
pub trait ModelLoader: Send + Sync {
    /// Where the classifier comes from, for logs and [`ModelInfo`].
    fn source(&self) -> String;

    fn load(&self) -> Result<Arc<dyn Classifier>, LoadError>;
}

/// Metadata recorded when a load succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub source: String,
    pub kind: ModelKind,
    pub supports_probability: bool,
    pub loaded_at: DateTime<Utc>,
    pub load_millis: u64,
}

/// Loads an artifact file, choosing the backend by extension:
/// `.json` for linear parameter files, `.onnx` for ONNX models.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    path: PathBuf,
}

impl ArtifactLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelLoader for ArtifactLoader {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Arc<dyn Classifier>, LoadError> {
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Arc::new(load_linear(&self.path)?)),
            Some("onnx") => load_onnx(&self.path),
            _ => Err(LoadError::UnsupportedFormat {
                path: self.path.clone(),
                reason: "expected a .json or .onnx artifact",
            }),
        }
    }
}

/// Read and validate a linear JSON artifact.
pub fn load_linear(path: &Path) -> Result<LinearClassifier, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: LinearArtifact =
        serde_json::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let classifier =
        LinearClassifier::from_artifact(artifact).map_err(|source| LoadError::Schema {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), kind = %classifier.kind(), "parsed linear artifact");
    Ok(classifier)
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Arc<dyn Classifier>, LoadError> {
    Ok(Arc::new(crate::onnx::OnnxClassifier::load(path)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<Arc<dyn Classifier>, LoadError> {
    Err(LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: "built without the `onnx` feature",
    })
}
