//! Feature assembly: validate a raw submission and lay it out in training order.

use serde::Serialize;

use crate::error::ValidationError;
use crate::patient::{RawField, RawPatientInput, RawValue};
use crate::schema::{Domain, FEATURE_COUNT, FEATURE_ORDER, Feature};

/// Validated feature values in [`FEATURE_ORDER`].
///
/// Only produced by [`assemble`] or [`FeatureVector::try_from_values`], so
/// every element is inside its feature's domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Validate already-encoded values given in [`FEATURE_ORDER`].
    pub fn try_from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, ValidationError> {
        let mut checked = [0.0; FEATURE_COUNT];
        for ((slot, feature), value) in checked.iter_mut().zip(FEATURE_ORDER).zip(values) {
            *slot = encode(feature, RawField::Number(value))?;
        }
        Ok(Self(checked))
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Single-precision row, as ONNX runtimes expect.
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.0.map(|v| v as f32)
    }

    pub fn iter_named(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        FEATURE_ORDER.into_iter().zip(self.0.iter().copied())
    }
}

/// Validate a raw submission and encode it as a [`FeatureVector`].
///
/// Labels are mapped to their training-time codes and numeric fields are
/// range-checked. The first invalid field, in feature order, is reported.
pub fn assemble(raw: &RawPatientInput) -> Result<FeatureVector, ValidationError> {
    let mut values = [0.0; FEATURE_COUNT];
    for (slot, feature) in values.iter_mut().zip(FEATURE_ORDER) {
        *slot = encode(feature, raw.field(feature))?;
    }
    Ok(FeatureVector(values))
}

fn encode(feature: Feature, field: RawField<'_>) -> Result<f64, ValidationError> {
    match (feature.domain(), field) {
        (Domain::Numeric { min, max, integral }, RawField::Number(value)) => {
            check_numeric(feature, value, min, max, integral)
        }
        (Domain::Numeric { min, max, integral }, RawField::Value(RawValue::Code(code))) => {
            check_numeric(feature, *code as f64, min, max, integral)
        }
        (Domain::Numeric { .. }, RawField::Value(RawValue::Label(label))) => {
            Err(ValidationError::UnknownLabel {
                field: feature,
                label: label.clone(),
            })
        }
        (domain @ Domain::Categorical(_), RawField::Number(value)) => {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field: feature });
            }
            if value.fract() != 0.0 {
                return Err(ValidationError::NotIntegral {
                    field: feature,
                    value,
                });
            }
            check_code(feature, &domain, value as i64)
        }
        (domain @ Domain::Categorical(_), RawField::Value(RawValue::Code(code))) => {
            check_code(feature, &domain, *code)
        }
        (domain @ Domain::Categorical(_), RawField::Value(RawValue::Label(label))) => domain
            .code_for_label(label)
            .map(|code| code as f64)
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: feature,
                label: label.clone(),
            }),
    }
}

fn check_numeric(
    feature: Feature,
    value: f64,
    min: f64,
    max: f64,
    integral: bool,
) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field: feature });
    }
    if integral && value.fract() != 0.0 {
        return Err(ValidationError::NotIntegral {
            field: feature,
            value,
        });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: feature,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn check_code(feature: Feature, domain: &Domain, code: i64) -> Result<f64, ValidationError> {
    let expected = domain.codes();
    if expected.contains(&code) {
        Ok(code as f64)
    } else {
        Err(ValidationError::UnknownCode {
            field: feature,
            code,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The reference submission: 45-year-old male, non-anginal pain.
    fn sample() -> RawPatientInput {
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

    fn field_error(raw: &RawPatientInput) -> Feature {
        assemble(raw).unwrap_err().field()
    }

    #[test]
    fn reference_submission_assembles_in_order() {
        let v = assemble(&sample()).unwrap();
        assert_eq!(
            v.as_array(),
            &[45.0, 1.0, 2.0, 130.0, 250.0, 0.0, 1.0, 150.0, 0.0, 1.5, 1.0, 0.0, 2.0]
        );
    }

    #[test]
    fn assembly_is_deterministic() {
        assert_eq!(assemble(&sample()).unwrap(), assemble(&sample()).unwrap());
    }

    #[test]
    fn female_maps_to_zero() {
        let mut raw = sample();
        raw.sex = "Female".into();
        assert_eq!(assemble(&raw).unwrap().get(Feature::Sex), 0.0);
    }

    fn set_value(raw: &mut RawPatientInput, feature: Feature, value: RawValue) {
        match feature {
            Feature::Sex => raw.sex = value,
            Feature::Cp => raw.cp = value,
            Feature::Fbs => raw.fbs = value,
            Feature::Restecg => raw.restecg = value,
            Feature::Exang => raw.exang = value,
            Feature::Slope => raw.slope = value,
            Feature::Ca => raw.ca = value,
            Feature::Thal => raw.thal = value,
            other => panic!("{other} is not categorical"),
        }
    }

    #[test]
    fn every_label_maps_to_its_code() {
        let mut checked = 0;
        for feature in FEATURE_ORDER {
            let Domain::Categorical(categories) = feature.domain() else {
                continue;
            };
            for category in categories {
                for &label in category.labels {
                    for spelling in [label.to_string(), label.to_uppercase()] {
                        let mut raw = sample();
                        set_value(&mut raw, feature, RawValue::Label(spelling.clone()));
                        let v = assemble(&raw).unwrap();
                        assert_eq!(v.get(feature), category.code as f64, "{feature} {spelling:?}");
                    }
                    checked += 1;
                }
            }
        }
        assert_eq!(checked, 24);
    }

    #[test]
    fn abbreviated_ecg_label_is_accepted() {
        let mut raw = sample();
        raw.restecg = "ST-T abnormality".into();
        assert_eq!(assemble(&raw).unwrap().get(Feature::Restecg), 1.0);
    }

    #[test]
    fn unrecognized_label_fails_fast() {
        let mut raw = sample();
        raw.sex = "Other".into();
        assert_eq!(
            assemble(&raw).unwrap_err(),
            ValidationError::UnknownLabel {
                field: Feature::Sex,
                label: "Other".into()
            }
        );
    }

    #[test]
    fn label_for_code_only_domain_is_rejected() {
        let mut raw = sample();
        raw.ca = "two".into();
        assert_eq!(field_error(&raw), Feature::Ca);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let mut raw = sample();
        raw.thal = 0.into();
        assert_eq!(
            assemble(&raw).unwrap_err(),
            ValidationError::UnknownCode {
                field: Feature::Thal,
                code: 0,
                expected: vec![1, 2, 3]
            }
        );
    }

    #[test]
    fn numeric_boundaries_are_inclusive() {
        let bounds = [
            (Feature::Age, 1.0, 120.0),
            (Feature::Trestbps, 80.0, 200.0),
            (Feature::Chol, 100.0, 600.0),
            (Feature::Thalach, 60.0, 220.0),
            (Feature::Oldpeak, 0.0, 10.0),
        ];
        for (feature, min, max) in bounds {
            for (value, ok) in [(min, true), (max, true), (min - 1.0, false), (max + 1.0, false)] {
                let mut raw = sample();
                match feature {
                    Feature::Age => raw.age = value,
                    Feature::Trestbps => raw.trestbps = value,
                    Feature::Chol => raw.chol = value,
                    Feature::Thalach => raw.thalach = value,
                    Feature::Oldpeak => raw.oldpeak = value,
                    _ => unreachable!(),
                }
                let result = assemble(&raw);
                assert_eq!(result.is_ok(), ok, "{feature} = {value}");
                if !ok {
                    assert!(matches!(
                        result.unwrap_err(),
                        ValidationError::OutOfRange { field, .. } if field == feature
                    ));
                }
            }
        }
    }

    #[test]
    fn categorical_boundaries() {
        let mut raw = sample();
        raw.ca = 3.into();
        assert!(assemble(&raw).is_ok());
        raw.ca = 4.into();
        assert_eq!(field_error(&raw), Feature::Ca);

        let mut raw = sample();
        raw.cp = (-1).into();
        assert_eq!(field_error(&raw), Feature::Cp);
    }

    #[test]
    fn fractional_age_is_rejected() {
        let mut raw = sample();
        raw.age = 45.5;
        assert_eq!(
            assemble(&raw).unwrap_err(),
            ValidationError::NotIntegral {
                field: Feature::Age,
                value: 45.5
            }
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut raw = sample();
        raw.oldpeak = f64::NAN;
        assert_eq!(
            assemble(&raw).unwrap_err(),
            ValidationError::NotFinite {
                field: Feature::Oldpeak
            }
        );

        let mut raw = sample();
        raw.chol = f64::INFINITY;
        assert_eq!(field_error(&raw), Feature::Chol);
    }

    #[test]
    fn first_invalid_field_in_order_is_reported() {
        let mut raw = sample();
        raw.thal = 9.into();
        raw.age = 0.0;
        assert_eq!(field_error(&raw), Feature::Age);
    }

    #[test]
    fn try_from_values_revalidates() {
        let values = [45.0, 1.0, 2.0, 130.0, 250.0, 0.0, 1.0, 150.0, 0.0, 1.5, 1.0, 0.0, 2.0];
        let v = FeatureVector::try_from_values(values).unwrap();
        assert_eq!(v, assemble(&sample()).unwrap());

        let mut bad = values;
        bad[Feature::Sex.index()] = 2.0;
        assert_eq!(
            FeatureVector::try_from_values(bad).unwrap_err().field(),
            Feature::Sex
        );

        let mut bad = values;
        bad[Feature::Slope.index()] = 0.5;
        assert!(matches!(
            FeatureVector::try_from_values(bad).unwrap_err(),
            ValidationError::NotIntegral { field: Feature::Slope, .. }
        ));
    }

    #[test]
    fn named_iteration_and_f32_row() {
        let v = assemble(&sample()).unwrap();
        let named: Vec<(Feature, f64)> = v.iter_named().collect();
        assert_eq!(named.len(), FEATURE_COUNT);
        assert_eq!(named[0], (Feature::Age, 45.0));
        assert_eq!(named[9], (Feature::Oldpeak, 1.5));
        assert_eq!(v.to_f32()[9], 1.5f32);
    }

    #[test]
    fn serializes_as_plain_array() {
        let v = assemble(&sample()).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[45.0,1.0,2.0,130.0,250.0,0.0,1.0,150.0,0.0,1.5,1.0,0.0,2.0]");
    }
}
