//! Entry point for `serve-model`.
use std::{env, process::ExitCode};

use serde_json::json;

use newsletter_launch::{
    cli::{parse_args, ServeArgs},
    config::LaunchConfig,
    lib::{exit::LaunchExit, paths, telemetry},
    server::{build_server_command, launch_server, SystemPortProbe},
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
    let args: ServeArgs = parse_args(env::args_os())?;
    let config_override = args.config_override.clone();
    let profile = args.into_profile().map_err(LaunchExit::from_error)?;
    let config = LaunchConfig::load(config_override).map_err(LaunchExit::from_error)?;

    if profile.dry_run {
        let planned = build_server_command(&config.server, &profile);
        let payload = json!({
            "command": planned,
            "log_file": paths::server_log_path(&config.server.log_dir, profile.port),
            "kill_existing": profile.kill_existing,
        });
        let rendered = serde_json::to_string_pretty(&payload).map_err(LaunchExit::from_error)?;
        println!("{rendered}");
        return Ok(());
    }

    let code = launch_server(&config.server, &profile, &SystemPortProbe)
        .await
        .map_err(LaunchExit::from_error)?;
    if code == 0 {
        Ok(())
    } else {
        Err(LaunchExit::child(code))
    }
}
