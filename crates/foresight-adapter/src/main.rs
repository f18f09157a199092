//! Single-shot forecast adapter: one JSON request on stdin, one JSON
//! outcome on stdout, exit status 0 iff the forecast succeeded.
//!
//! Logs go to stderr only (`RUST_LOG` controls the level), keeping stdout
//! reserved for the result document.

use std::io::{self, Read};
use std::process::ExitCode;

use foresight_adapter::run_forecast;
use foresight_core::{ForecastConfig, Observation, Outcome};
use foresight_model::ProphetModel;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Top-level request document. Unrecognized fields are ignored.
#[derive(Debug, Default, Deserialize)]
struct Request {
    #[serde(default)]
    data: Vec<Observation>,
    #[serde(default)]
    config: ForecastConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let outcome = handle_request();

    // Exactly one document on stdout, whichever path was taken. Encoding
    // our own types cannot realistically fail; keep a literal fallback so
    // the invariant holds even then.
    let document = serde_json::to_string(&outcome)
        .unwrap_or_else(|_| r#"{"success":false,"error":"failed to encode outcome"}"#.into());
    println!("{document}");

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn handle_request() -> Outcome {
    let mut raw = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut raw) {
        return Outcome::failure(format!("Unexpected error: {err}"));
    }

    let request: Request = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(err) => return Outcome::failure(format!("Unexpected error: {err}")),
    };

    if request.data.is_empty() {
        return Outcome::failure("No data provided");
    }

    run_forecast(&mut ProphetModel::new(), &request.data, &request.config)
}
