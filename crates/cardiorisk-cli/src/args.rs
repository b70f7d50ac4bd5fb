//! Command-line surface. Flag defaults mirror the intake form's initial values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use cardiorisk_core::{FEATURE_NAMES, RawPatientInput, RawValue};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cardiorisk",
    version,
    about = "Heart disease risk prediction from patient intake data"
)]
pub struct Cli {
    /// Classifier artifact (.json linear model or .onnx).
    #[arg(
        long,
        env = "CARDIORISK_MODEL",
        default_value = "models/heart-disease.json",
        global = true
    )]
    pub model: PathBuf,

    /// Give up waiting for the model to load after this many seconds.
    #[arg(long, env = "CARDIORISK_LOAD_TIMEOUT_SECS", global = true)]
    pub load_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one patient and print the result.
    Predict {
        #[command(flatten)]
        patient: PatientArgs,

        /// Print the assessment as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate one patient and print the ordered feature vector.
    Features {
        #[command(flatten)]
        patient: PatientArgs,
    },
    /// Load the model and print its metadata.
    Inspect,
    /// Print the feature order and each field's valid values.
    Schema,
}

#[derive(Debug, Args)]
pub struct PatientArgs {
    /// Read the submission from a JSON file instead of flags.
    #[arg(long, value_name = "FILE", conflicts_with_all = FEATURE_NAMES)]
    pub input: Option<PathBuf>,

    #[arg(long, default_value_t = 30.0)]
    pub age: f64,
    /// Male or Female (or 1 / 0).
    #[arg(long, default_value = "Male")]
    pub sex: RawValue,
    /// Chest pain type, 0-3.
    #[arg(long, default_value = "0")]
    pub cp: RawValue,
    /// Resting blood pressure (mm Hg).
    #[arg(long, default_value_t = 120.0)]
    pub trestbps: f64,
    /// Serum cholesterol (mg/dl).
    #[arg(long, default_value_t = 200.0)]
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl, 0 or 1.
    #[arg(long, default_value = "0")]
    pub fbs: RawValue,
    /// Resting ECG result, 0-2.
    #[arg(long, default_value = "0")]
    pub restecg: RawValue,
    /// Max heart rate achieved.
    #[arg(long, default_value_t = 150.0)]
    pub thalach: f64,
    /// Exercise induced angina, 0 or 1.
    #[arg(long, default_value = "0")]
    pub exang: RawValue,
    /// ST depression induced by exercise.
    #[arg(long, default_value_t = 1.0)]
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment, 0-2.
    #[arg(long, default_value = "0")]
    pub slope: RawValue,
    /// Number of major vessels, 0-3.
    #[arg(long, default_value = "0")]
    pub ca: RawValue,
    /// Thalassemia, 1-3.
    #[arg(long, default_value = "1")]
    pub thal: RawValue,
}

impl PatientArgs {
    pub fn into_raw(self) -> anyhow::Result<RawPatientInput> {
        if let Some(path) = self.input {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("parsing patient record {}", path.display()));
        }
        Ok(RawPatientInput {
            age: self.age,
            sex: self.sex,
            cp: self.cp,
            trestbps: self.trestbps,
            chol: self.chol,
            fbs: self.fbs,
            restecg: self.restecg,
            thalach: self.thalach,
            exang: self.exang,
            oldpeak: self.oldpeak,
            slope: self.slope,
            ca: self.ca,
            thal: self.thal,
        })
    }
}
