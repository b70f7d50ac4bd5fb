use std::time::Duration;

use cardiorisk_core::{ClassificationResult, FeatureVector};

use crate::classifier::classify;
use crate::error::PredictError;
use crate::handle::ModelHandle;

/// Predicts from feature vectors using the classifier behind a [`ModelHandle`].
///
/// Cheap to clone; clones share the handle. Once the classifier is ready,
/// `predict` takes no lock for the prediction itself.
#[derive(Clone)]
pub struct InferenceService {
    model: ModelHandle,
    load_timeout: Option<Duration>,
}

impl InferenceService {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model,
            load_timeout: None,
        }
    }

    /// Bound how long `predict` waits for a load in flight.
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<ClassificationResult, PredictError> {
        let classifier = self.model.classifier(self.load_timeout)?;
        Ok(classify(classifier.as_ref(), features)?)
    }
}
