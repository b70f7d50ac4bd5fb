mod args;
mod display;

use std::process::ExitCode;

use cardiorisk_ai::{InferenceService, ModelHandle, RiskError, RiskPredictor};
use cardiorisk_core::assemble;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Command};

/// Exit status for input the user must correct.
const EXIT_INVALID_INPUT: u8 = 2;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("cardiorisk v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut service = InferenceService::new(ModelHandle::open(&cli.model));
    if let Some(timeout) = cli.load_timeout() {
        service = service.with_load_timeout(timeout);
    }

    match cli.command {
        Command::Predict { patient, json } => {
            let raw = patient.into_raw()?;
            let predictor = RiskPredictor::new(service);
            match predictor.evaluate(&raw) {
                Ok(assessment) if json => {
                    println!("{}", serde_json::to_string_pretty(&assessment)?);
                }
                Ok(assessment) => print!("{}", display::render_assessment(&assessment)),
                Err(err) => return Ok(report(&err)),
            }
        }
        Command::Features { patient } => {
            let raw = patient.into_raw()?;
            match assemble(&raw) {
                Ok(features) => print!("{}", display::render_features(&features)),
                Err(err) => return Ok(report(&RiskError::from(err))),
            }
        }
        Command::Inspect => match service.model().load() {
            Ok(info) => print!("{}", display::render_model_info(&info)),
            Err(err) => return Ok(report(&RiskError::Load(err))),
        },
        Command::Schema => print!("{}", display::render_schema()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Show a pipeline failure to the user and pick the exit status.
fn report(err: &RiskError) -> ExitCode {
    tracing::debug!(error = ?err, "request failed");
    eprintln!("{}", err.user_message());
    if err.is_validation() {
        ExitCode::from(EXIT_INVALID_INPUT)
    } else {
        ExitCode::FAILURE
    }
}
