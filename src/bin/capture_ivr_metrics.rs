//! Applies one IVR routing event against Twilio.
//!
//! Usage:
//!
//! ```text
//! capture-ivr-metrics [event-path]
//! ```
//!
//! The routing event is read as JSON from `event-path`, or from standard
//! input when no path is given. A representative event is:
//!
//! ```json
//! {
//!   "activeTaskSid": "WT0123456789abcdef0123456789abcdef",
//!   "callSid": "CA0123456789abcdef0123456789abcdef",
//!   "firstIvrTaskSid": "WTfedcba9876543210fedcba9876543210",
//!   "isFinalIvrTask": "false",
//!   "ivrPath": "main/billing"
//! }
//! ```
//!
//! Settings come from the environment (see `ivr_metrics::config`), optionally
//! seeded from a `.env` file. The reply is written to standard output as JSON
//! and the process exits non-zero when the reply is a failure. Logs go to
//! standard error and are filtered with `RUST_LOG` (default
//! `ivr_metrics=info`).

use ivr_metrics::{
    call_state::{adapters::twilio::TwilioSyncStore, services::CallStateRecorder},
    config::{ConfigError, Settings},
    ivr_task::{adapters::twilio::TwilioTaskRouter, services::TaskLifecycleService},
    transition::{
        domain::HandlerResponse,
        services::{IvrMetricsHandler, IvrTransitionCoordinator},
    },
};
use mockable::DefaultClock;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ivr_metrics=info";

/// Errors that prevent a reply from being produced at all.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read routing event: {0}")]
    EventRead(#[source] io::Error),
    #[error("failed to parse routing event: {0}")]
    EventParse(#[source] serde_json::Error),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to encode reply: {0}")]
    ReplyEncode(#[source] serde_json::Error),
    #[error("failed to write reply: {0}")]
    ReplyWrite(#[source] io::Error),
}

type TwilioHandler = IvrMetricsHandler<TwilioTaskRouter, TwilioSyncStore, DefaultClock>;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(response) if response.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "capture-ivr-metrics failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<HandlerResponse, CliError> {
    if let Err(err) = dotenvy::dotenv() {
        debug!(error = %err, "no .env file loaded");
    }
    let settings = Settings::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let payload = read_event(&args)?;
    let handler = build_handler(&settings)?;

    let response = handler.handle(&payload).await;
    let encoded = serde_json::to_string(&response).map_err(CliError::ReplyEncode)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{encoded}").map_err(CliError::ReplyWrite)?;
    Ok(response)
}

fn read_event(args: &[String]) -> Result<Value, CliError> {
    let raw = match args {
        [] => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::EventRead)?;
            buffer
        }
        [path] => std::fs::read_to_string(path).map_err(CliError::EventRead)?,
        _ => {
            return Err(CliError::InvalidArgs(
                "expected at most one event path".to_owned(),
            ));
        }
    };
    serde_json::from_str(&raw).map_err(CliError::EventParse)
}

fn build_handler(settings: &Settings) -> Result<TwilioHandler, CliError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(CliError::HttpClient)?;
    let credentials = settings.credentials();

    let router = TwilioTaskRouter::new(
        client.clone(),
        Arc::clone(&credentials),
        settings.workspace_sid(),
    )
    .with_base_url(settings.taskrouter_base_url());
    let store = TwilioSyncStore::new(client, credentials, settings.sync_service_sid())
        .with_base_url(settings.sync_base_url());

    let tasks = TaskLifecycleService::new(
        Arc::new(router),
        Arc::new(DefaultClock),
        settings.ivr_workflow_sid().clone(),
    );
    let call_state = CallStateRecorder::new(Arc::new(store));
    Ok(IvrMetricsHandler::new(IvrTransitionCoordinator::new(
        tasks, call_state,
    )))
}
