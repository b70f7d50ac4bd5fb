//! Text rendering for assessments, feature vectors, schema, and model metadata.

use std::fmt::Write;

use cardiorisk_ai::{Assessment, ModelInfo};
use cardiorisk_core::{Confidence, DiseaseLabel, FEATURE_ORDER, FeatureVector};

/// Headline shown for a label.
pub fn label_line(label: DiseaseLabel) -> &'static str {
    match label {
        DiseaseLabel::NoDisease => "No Heart Disease Detected.",
        DiseaseLabel::Disease => "Risk of Heart Disease Detected!",
    }
}

/// Confidence as a percentage with two decimals, e.g. `83.12%`.
pub fn format_confidence(confidence: Confidence) -> String {
    format!("{:.2}%", confidence.percent())
}

pub fn render_assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let result = &assessment.result;
    let marker = if result.label.is_disease() { "[!]" } else { "[ok]" };
    let _ = writeln!(out, "=== Result ===");
    let _ = writeln!(out, "{marker} {}", label_line(result.label));
    match result.confidence {
        Some(c) => {
            let _ = writeln!(out, "Model Confidence: {}", format_confidence(c));
        }
        None => {
            let _ = writeln!(out, "Model Confidence: not available for this model");
        }
    }
    out
}

pub fn render_features(features: &FeatureVector) -> String {
    let mut out = String::new();
    for (i, (feature, value)) in features.iter_named().enumerate() {
        let _ = writeln!(out, "{i:>2}  {:<10} {value}", feature.name());
    }
    out
}

pub fn render_schema() -> String {
    let mut out = String::new();
    for feature in FEATURE_ORDER {
        let _ = writeln!(
            out,
            "{:>2}  {:<10} {:<34} {}",
            feature.index(),
            feature.name(),
            feature.description(),
            feature.domain()
        );
    }
    out
}

pub fn render_model_info(info: &ModelInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Model ===");
    let _ = writeln!(out, "  {:<22} {}", "source", info.source);
    let _ = writeln!(out, "  {:<22} {}", "kind", info.kind);
    let _ = writeln!(
        out,
        "  {:<22} {}",
        "probability estimates",
        if info.supports_probability { "yes" } else { "no" }
    );
    let _ = writeln!(out, "  {:<22} {}", "loaded at", info.loaded_at.to_rfc3339());
    let _ = writeln!(out, "  {:<22} {} ms", "load time", info.load_millis);
    out
}
