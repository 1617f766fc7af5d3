//! `lingshu-check` -- evaluate a JSON check request with the data handler.
//!
//! Reads `{ "data", "schema", "defaultValue"?, "strict"? }` from the file
//! given as the first argument, else from `LINGSHU_INPUT`, else from stdin, and
//! prints `{ "result", "errors" }` to stdout. See [`config::CliConfig`] for
//! the environment variables.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod check;
mod config;

use check::CheckRequest;
use config::CliConfig;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingshu_cli=info,lingshu_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Check failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let input_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = CliConfig::from_env()?.with_input_arg(input_arg);

    let raw = read_input(&config)?;
    let request: CheckRequest =
        serde_json::from_str(&raw).context("Request is not a valid check document")?;

    let evaluation = check::check(&request, config.strict)?;
    if !evaluation.errors.is_empty() {
        tracing::info!(errors = evaluation.errors.len(), "Fields failed validation");
    }

    let output = if config.pretty {
        serde_json::to_string_pretty(&evaluation)?
    } else {
        serde_json::to_string(&evaluation)?
    };
    println!("{output}");
    Ok(())
}

fn read_input(config: &CliConfig) -> anyhow::Result<String> {
    match &config.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read request from stdin")?;
            Ok(raw)
        }
    }
}
