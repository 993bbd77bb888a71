use std::process::Stdio;

use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{info, Instrument};

use crate::{
    cli::ServeProfile,
    config::ServerSection,
    lib::{
        errors::LaunchError,
        paths,
        process::{exit_code_of, tee_streams, PlannedCommand},
        telemetry::{self, LaunchSpan, ServerLaunchTelemetry},
    },
};

use super::{build_server_command, ensure_port_available, PortProbe, PortStatus};

/// Free the port, start the model server, and relay its output until it exits.
///
/// Returns the server's exit code unchanged.
pub async fn launch_server<P>(
    section: &ServerSection,
    profile: &ServeProfile,
    probe: &P,
) -> Result<u8, LaunchError>
where
    P: PortProbe + ?Sized,
{
    let status = ensure_port_available(
        probe,
        &profile.host,
        profile.port,
        profile.kill_existing,
        section.kill_grace(),
    )
    .await?;
    if let PortStatus::Freed { pids } = &status {
        info!(
            target: "newsletter_launch::server",
            port = profile.port,
            killed = ?pids,
            "Freed port for model server"
        );
    }

    let planned = build_server_command(section, profile);
    let (log_path, log_file) = paths::open_append_log(&section.log_dir, profile.port)?;
    let log_path_display = log_path.display().to_string();
    let mut log = File::from_std(log_file);

    telemetry::emit_server_launch(&ServerLaunchTelemetry {
        host: &profile.host,
        port: profile.port,
        model: &profile.model,
        log_path: &log_path_display,
        cuda_visible_devices: profile.cuda_visible_devices.as_deref(),
        args: &planned.args,
    });

    let header = log_header(&planned);
    log.write_all(header.as_bytes())
        .await
        .map_err(|source| LaunchError::LogFile {
            path: log_path.clone(),
            source,
        })?;

    let span = LaunchSpan::start("server");
    let code = run_and_tee(&planned, &mut log)
        .instrument(span.span().clone())
        .await?;
    span.finish(code);
    Ok(code)
}

async fn run_and_tee(planned: &PlannedCommand, log: &mut File) -> Result<u8, LaunchError> {
    let mut command = planned.to_command();
    command
        .kill_on_drop(true)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|err| LaunchError::from_spawn(&planned.program, err))?;
    info!(
        target: "newsletter_launch::server",
        pid = child.id().unwrap_or_default(),
        command = %planned.display(),
        "Model server started"
    );

    let io_error = |source| LaunchError::Io {
        program: planned.program.clone(),
        source,
    };
    let mut console = tokio::io::stdout();
    tee_streams(child.stdout.take(), child.stderr.take(), &mut console, log)
        .await
        .map_err(io_error)?;
    let status = child.wait().await.map_err(io_error)?;
    Ok(exit_code_of(status))
}

fn log_header(planned: &PlannedCommand) -> String {
    format!(
        "===== {} starting: {} =====\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        planned.display()
    )
}
