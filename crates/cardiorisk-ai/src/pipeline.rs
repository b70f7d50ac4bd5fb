//! Request pipeline: raw submission → feature vector → classification.

use std::sync::Arc;

use cardiorisk_core::{
    ClassificationResult, FeatureVector, RawPatientInput, ValidationError, assemble,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::{InferenceError, LoadError, PredictError};
use crate::service::InferenceService;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("model unavailable: {0}")]
    Load(Arc<LoadError>),

    #[error("prediction failed: {0}")]
    Inference(InferenceError),
}

impl From<PredictError> for RiskError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Load(e) => Self::Load(e),
            PredictError::Inference(e) => Self::Inference(e),
        }
    }
}

impl RiskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message suitable for showing to the person who filled in the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => format!("Please correct the form: {e}."),
            Self::Load(e) => format!(
                "The prediction model is not available ({e}). Reload the model and try again."
            ),
            Self::Inference(e) => format!("The prediction could not be completed ({e})."),
        }
    }
}

/// Outcome of one submission: the vector sent to the classifier and its result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub features: FeatureVector,
    pub result: ClassificationResult,
}

#[derive(Clone)]
pub struct RiskPredictor {
    service: InferenceService,
}

impl RiskPredictor {
    pub fn new(service: InferenceService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &InferenceService {
        &self.service
    }

    /// Validate a submission and classify it. Nothing reaches the classifier
    /// unless every field is inside its domain.
    pub fn evaluate(&self, raw: &RawPatientInput) -> Result<Assessment, RiskError> {
        let features = assemble(raw)?;
        let result = self.service.predict(&features)?;
        Ok(Assessment { features, result })
    }
}
