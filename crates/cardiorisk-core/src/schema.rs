//! Feature schema shared by the assembler and every classifier artifact.
//!
//! The classifier was fitted on 13 columns in a fixed order. [`FEATURE_ORDER`]
//! is the single definition of that order; the assembler writes vectors in it
//! and artifact loaders check their metadata against [`FEATURE_NAMES`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of features the classifier expects.
pub const FEATURE_COUNT: usize = 13;

/// One clinical input column.
///
/// Discriminants equal the column's position in [`FEATURE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Age = 0,
    Sex = 1,
    Cp = 2,
    Trestbps = 3,
    Chol = 4,
    Fbs = 5,
    Restecg = 6,
    Thalach = 7,
    Exang = 8,
    Oldpeak = 9,
    Slope = 10,
    Ca = 11,
    Thal = 12,
}

/// Column order of the trained classifier.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Age,
    Feature::Sex,
    Feature::Cp,
    Feature::Trestbps,
    Feature::Chol,
    Feature::Fbs,
    Feature::Restecg,
    Feature::Thalach,
    Feature::Exang,
    Feature::Oldpeak,
    Feature::Slope,
    Feature::Ca,
    Feature::Thal,
];

/// Column names in [`FEATURE_ORDER`], as they appear in artifact metadata.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// A training-time code and the human-readable labels that map to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: i64,
    /// Lowercase labels; matching is ASCII case-insensitive.
    pub labels: &'static [&'static str],
}

/// Declared valid values for a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Inclusive numeric range. `integral` rejects fractional values.
    Numeric { min: f64, max: f64, integral: bool },
    /// Enumerated codes, optionally addressable by label.
    Categorical(&'static [Category]),
}

// ── Enumerated domains ──

const SEX: &[Category] = &[
    Category { code: 0, labels: &["female"] },
    Category { code: 1, labels: &["male"] },
];

const CHEST_PAIN: &[Category] = &[
    Category { code: 0, labels: &["typical angina"] },
    Category { code: 1, labels: &["atypical angina"] },
    Category { code: 2, labels: &["non-anginal pain"] },
    Category { code: 3, labels: &["asymptomatic"] },
];

const FLAG: &[Category] = &[
    Category { code: 0, labels: &["no", "false"] },
    Category { code: 1, labels: &["yes", "true"] },
];

const RESTING_ECG: &[Category] = &[
    Category { code: 0, labels: &["normal"] },
    Category { code: 1, labels: &["st-t abnormality", "st-t wave abnormality"] },
    Category { code: 2, labels: &["left ventricular hypertrophy"] },
];

const ST_SLOPE: &[Category] = &[
    Category { code: 0, labels: &["upsloping"] },
    Category { code: 1, labels: &["flat"] },
    Category { code: 2, labels: &["downsloping"] },
];

const VESSELS: &[Category] = &[
    Category { code: 0, labels: &[] },
    Category { code: 1, labels: &[] },
    Category { code: 2, labels: &[] },
    Category { code: 3, labels: &[] },
];

const THALASSEMIA: &[Category] = &[
    Category { code: 1, labels: &["normal"] },
    Category { code: 2, labels: &["fixed defect"] },
    Category { code: 3, labels: &["reversible defect"] },
];

impl Feature {
    /// Column position in the feature vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name used in artifact metadata and serialized input.
    pub const fn name(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Human-readable description for form labels and help text.
    pub fn description(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::Cp => "Chest pain type",
            Self::Trestbps => "Resting blood pressure (mm Hg)",
            Self::Chol => "Serum cholesterol (mg/dl)",
            Self::Fbs => "Fasting blood sugar > 120 mg/dl",
            Self::Restecg => "Resting ECG result",
            Self::Thalach => "Max heart rate achieved",
            Self::Exang => "Exercise induced angina",
            Self::Oldpeak => "ST depression (oldpeak)",
            Self::Slope => "Slope of peak exercise ST segment",
            Self::Ca => "Number of major vessels (0-3)",
            Self::Thal => "Thalassemia",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Self::Age => Domain::Numeric { min: 1.0, max: 120.0, integral: true },
            Self::Sex => Domain::Categorical(SEX),
            Self::Cp => Domain::Categorical(CHEST_PAIN),
            Self::Trestbps => Domain::Numeric { min: 80.0, max: 200.0, integral: true },
            Self::Chol => Domain::Numeric { min: 100.0, max: 600.0, integral: true },
            Self::Fbs | Self::Exang => Domain::Categorical(FLAG),
            Self::Restecg => Domain::Categorical(RESTING_ECG),
            Self::Thalach => Domain::Numeric { min: 60.0, max: 220.0, integral: true },
            Self::Oldpeak => Domain::Numeric { min: 0.0, max: 10.0, integral: false },
            Self::Slope => Domain::Categorical(ST_SLOPE),
            Self::Ca => Domain::Categorical(VESSELS),
            Self::Thal => Domain::Categorical(THALASSEMIA),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Domain {
    /// Codes accepted by a categorical domain; empty for numeric domains.
    pub fn codes(&self) -> Vec<i64> {
        match self {
            Self::Numeric { .. } => Vec::new(),
            Self::Categorical(categories) => categories.iter().map(|c| c.code).collect(),
        }
    }

    /// Look up the code for a label, ignoring ASCII case and surrounding whitespace.
    pub fn code_for_label(&self, label: &str) -> Option<i64> {
        let Self::Categorical(categories) = self else {
            return None;
        };
        let label = label.trim();
        categories
            .iter()
            .find(|c| c.labels.iter().any(|l| l.eq_ignore_ascii_case(label)))
            .map(|c| c.code)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric { min, max, integral: true } => write!(f, "whole number {min}..={max}"),
            Self::Numeric { min, max, integral: false } => write!(f, "number {min}..={max}"),
            Self::Categorical(categories) => {
                let parts: Vec<String> = categories
                    .iter()
                    .map(|c| match c.labels.first() {
                        Some(label) => format!("{} ({label})", c.code),
                        None => c.code.to_string(),
                    })
                    .collect();
                write!(f, "one of {}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_discriminants() {
        for (i, feature) in FEATURE_ORDER.iter().enumerate() {
            assert_eq!(feature.index(), i, "{feature} out of place");
        }
    }

    #[test]
    fn names_follow_training_order() {
        let names: Vec<&str> = FEATURE_ORDER.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal"
            ]
        );
    }

    #[test]
    fn sex_labels_map_to_training_codes() {
        let domain = Feature::Sex.domain();
        assert_eq!(domain.code_for_label("Male"), Some(1));
        assert_eq!(domain.code_for_label("Female"), Some(0));
        assert_eq!(domain.code_for_label(" MALE "), Some(1));
        assert_eq!(domain.code_for_label("unknown"), None);
    }

    #[test]
    fn resting_ecg_accepts_both_abnormality_spellings() {
        let domain = Feature::Restecg.domain();
        assert_eq!(domain.code_for_label("st-t abnormality"), Some(1));
        assert_eq!(domain.code_for_label("ST-T wave abnormality"), Some(1));
    }

    #[test]
    fn labels_are_unique_within_a_domain() {
        for feature in FEATURE_ORDER {
            let Domain::Categorical(categories) = feature.domain() else {
                continue;
            };
            let mut labels: Vec<&str> =
                categories.iter().flat_map(|c| c.labels.iter().copied()).collect();
            let total = labels.len();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), total, "{feature} has a label on two codes");
        }
    }

    #[test]
    fn categorical_codes_are_unique() {
        for feature in FEATURE_ORDER {
            let codes = feature.domain().codes();
            let mut deduped = codes.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(codes.len(), deduped.len(), "{feature} has duplicate codes");
        }
    }

    #[test]
    fn numeric_domain_has_no_labels() {
        assert_eq!(Feature::Age.domain().code_for_label("old"), None);
        assert!(Feature::Age.domain().codes().is_empty());
    }

    #[test]
    fn domain_display() {
        assert_eq!(Feature::Age.domain().to_string(), "whole number 1..=120");
        assert_eq!(Feature::Sex.domain().to_string(), "one of 0 (female), 1 (male)");
        assert_eq!(Feature::Ca.domain().to_string(), "one of 0, 1, 2, 3");
    }
}
