//! Entry point for `run-pipeline`.
use std::{env, process::ExitCode};

use newsletter_launch::{
    cli::{parse_args, PipelineArgs},
    config::LaunchConfig,
    lib::{exit::LaunchExit, telemetry},
    pipeline::{self, build_pipeline_command, outcome_message},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), LaunchExit> {
    telemetry::init_tracing().map_err(LaunchExit::from_error)?;
    let args: PipelineArgs = parse_args(env::args_os())?;
    let config_override = args.config_override.clone();
    let dry_run = args.dry_run;

    let request = args
        .into_request(&pipeline::today())
        .map_err(LaunchExit::from_error)?;
    let config = LaunchConfig::load(config_override).map_err(LaunchExit::from_error)?;
    request
        .check_pipeline_type(&config.pipeline.pipeline_types)
        .map_err(LaunchExit::from_error)?;

    if dry_run {
        let planned = build_pipeline_command(&config.pipeline, &request);
        println!("{}", planned.to_json().map_err(LaunchExit::from_error)?);
        return Ok(());
    }

    let code = pipeline::run_pipeline(&config.pipeline, &request)
        .await
        .map_err(LaunchExit::from_error)?;
    println!("{}", outcome_message(code));
    if code == 0 {
        Ok(())
    } else {
        Err(LaunchExit::child(code))
    }
}
