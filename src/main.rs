//! Entry point for batch-publish.
use std::process::ExitCode;

use anyhow::Error;
use batch_publish::{
    cli::{ParsedCommand, PublishArgs, RunContext, RuntimeExit, APP_NAME},
    config::PublishSettings,
    lib::{output, telemetry},
    publish::{self, RunSummary},
};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(summary) if summary.cancelled => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<RunSummary, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = PublishArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;

    match command {
        ParsedCommand::ShowVersion => {
            output::print_version(APP_NAME, env!("CARGO_PKG_VERSION"));
            Ok(RunSummary::default())
        }
        ParsedCommand::Run {
            context,
            config_override,
        } => run(context, config_override).await,
    }
}

async fn run(
    context: RunContext,
    config_override: Option<std::path::PathBuf>,
) -> Result<RunSummary, RuntimeExit> {
    let settings = PublishSettings::resolve(config_override, &context.project_path)
        .map_err(|err| RuntimeExit::from_error(Error::new(err)))?;

    let cancel = CancellationToken::new();
    let watcher = publish::watch_for_interrupt(cancel.clone());
    let result = publish::run_publish(&context, &settings, cancel.clone()).await;
    watcher.abort();

    result.map_err(|err| RuntimeExit::from_error(Error::new(err)))
}
