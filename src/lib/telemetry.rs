//! Telemetry initialization and launch span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording start and finish of one launched child process.
pub struct LaunchSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
}

impl LaunchSpan {
    /// Start a span for a launch of the given kind (`pipeline` or `server`).
    pub fn start(launch_kind: &'static str) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            target: "newsletter_launch::launch",
            "launch",
            %run_id,
            launch_kind
        );
        Self {
            span,
            started_at: Instant::now(),
            run_id,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording the child's exit code.
    pub fn finish(self, exit_code: u8) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let status = if exit_code == 0 { "succeeded" } else { "failed" };
        let _entered = self.span.enter();
        info!(
            target: "newsletter_launch::launch",
            run_id = %self.run_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Child process finished"
        );
    }
}

/// Structured record of a pipeline invocation.
#[derive(Debug, Serialize)]
pub struct PipelineLaunchTelemetry<'a> {
    pub country: &'a str,
    pub le_book: &'a str,
    pub pipeline_type: &'a str,
    pub business_date: &'a str,
    pub date_defaulted: bool,
    pub program: &'a str,
}

pub fn emit_pipeline_launch(telemetry: &PipelineLaunchTelemetry<'_>) {
    info!(
        target: "newsletter_launch::pipeline",
        country = telemetry.country,
        le_book = telemetry.le_book,
        pipeline_type = telemetry.pipeline_type,
        business_date = telemetry.business_date,
        date_defaulted = telemetry.date_defaulted,
        program = telemetry.program,
        "Starting NewsLetter pipeline"
    );
}

/// Structured record of a model server launch.
#[derive(Debug, Serialize)]
pub struct ServerLaunchTelemetry<'a> {
    pub host: &'a str,
    pub port: u16,
    pub model: &'a str,
    pub log_path: &'a str,
    pub cuda_visible_devices: Option<&'a str>,
    pub args: &'a [String],
}

pub fn emit_server_launch(telemetry: &ServerLaunchTelemetry<'_>) {
    info!(
        target: "newsletter_launch::server",
        host = telemetry.host,
        port = telemetry.port,
        model = telemetry.model,
        log_path = telemetry.log_path,
        cuda_visible_devices = telemetry.cuda_visible_devices.unwrap_or(""),
        args = ?telemetry.args,
        "Starting model server"
    );
}
