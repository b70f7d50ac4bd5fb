//! Raw patient-intake record as submitted by a form or another input source.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::Feature;

/// A categorical or boolean form value: either its numeric code or a label.
///
/// Deserializes untagged, so `2` is a code and `"Male"` is a label. A
/// whole-number float such as `2.0` is also a code; any other float is kept
/// as a label and rejected during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Code(i64),
    Label(String),
}

impl RawValue {
    fn from_number(value: f64) -> Self {
        if value.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&value) {
            Self::Code(value as i64)
        } else {
            Self::Label(value.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Code(i64),
            Number(f64),
            Label(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Code(code) => Self::Code(code),
            Wire::Number(value) => Self::from_number(value),
            Wire::Label(label) => Self::Label(label),
        })
    }
}

impl FromStr for RawValue {
    type Err = Infallible;

    /// Integer text becomes a code; anything else is kept as a label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(code) => Self::Code(code),
            Err(_) => Self::Label(s.to_string()),
        })
    }
}

impl From<i64> for RawValue {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for RawValue {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// One form submission. Field names match the training columns.
///
/// Created per submission, assembled into a
/// [`FeatureVector`](crate::FeatureVector), then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPatientInput {
    pub age: f64,
    pub sex: RawValue,
    /// Chest pain type.
    pub cp: RawValue,
    /// Resting blood pressure.
    pub trestbps: f64,
    /// Serum cholesterol.
    pub chol: f64,
    /// Fasting blood sugar above 120 mg/dl.
    pub fbs: RawValue,
    /// Resting ECG result.
    pub restecg: RawValue,
    /// Max heart rate achieved.
    pub thalach: f64,
    /// Exercise induced angina.
    pub exang: RawValue,
    /// ST depression induced by exercise.
    pub oldpeak: f64,
    pub slope: RawValue,
    /// Number of major vessels coloured by fluoroscopy.
    pub ca: RawValue,
    pub thal: RawValue,
}

/// A borrowed view of one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawField<'a> {
    Number(f64),
    Value(&'a RawValue),
}

impl RawPatientInput {
    pub fn field(&self, feature: Feature) -> RawField<'_> {
        match feature {
            Feature::Age => RawField::Number(self.age),
            Feature::Sex => RawField::Value(&self.sex),
            Feature::Cp => RawField::Value(&self.cp),
            Feature::Trestbps => RawField::Number(self.trestbps),
            Feature::Chol => RawField::Number(self.chol),
            Feature::Fbs => RawField::Value(&self.fbs),
            Feature::Restecg => RawField::Value(&self.restecg),
            Feature::Thalach => RawField::Number(self.thalach),
            Feature::Exang => RawField::Value(&self.exang),
            Feature::Oldpeak => RawField::Number(self.oldpeak),
            Feature::Slope => RawField::Value(&self.slope),
            Feature::Ca => RawField::Value(&self.ca),
            Feature::Thal => RawField::Value(&self.thal),
        }
    }
}
