pub mod assemble;
pub mod error;
pub mod patient;
pub mod result;
pub mod schema;

pub use assemble::{FeatureVector, assemble};
pub use error::ValidationError;
pub use patient::{RawField, RawPatientInput, RawValue};
pub use result::{ClassificationResult, Confidence, DiseaseLabel, InvalidProbability};
pub use schema::{Category, Domain, FEATURE_COUNT, FEATURE_NAMES, FEATURE_ORDER, Feature};
