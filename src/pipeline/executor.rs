use tracing::{info, Instrument};

use crate::{
    config::PipelineSection,
    lib::{
        errors::LaunchError,
        process::{exit_code_of, PlannedCommand},
        telemetry::{self, LaunchSpan, PipelineLaunchTelemetry},
    },
};

use super::PipelineRequest;

/// `<interpreter> <script> --country C --le_book L --pipeline_type P --business_date D`.
pub fn build_pipeline_command(
    section: &PipelineSection,
    request: &PipelineRequest,
) -> PlannedCommand {
    let mut command =
        PlannedCommand::new(&section.interpreter).arg(section.script.to_string_lossy());
    for (flag, value) in request.flags() {
        command = command.flag(flag, value);
    }
    command.working_dir = section.working_dir.clone();
    command
}

/// Run the pipeline with inherited stdio and return its exit code unchanged.
pub async fn run_pipeline(
    section: &PipelineSection,
    request: &PipelineRequest,
) -> Result<u8, LaunchError> {
    let planned = build_pipeline_command(section, request);
    telemetry::emit_pipeline_launch(&PipelineLaunchTelemetry {
        country: &request.country,
        le_book: &request.le_book,
        pipeline_type: &request.pipeline_type,
        business_date: &request.business_date,
        date_defaulted: request.date_defaulted,
        program: &planned.program,
    });

    let span = LaunchSpan::start("pipeline");
    let status = planned
        .to_command()
        .status()
        .instrument(span.span().clone())
        .await
        .map_err(|err| LaunchError::from_spawn(&planned.program, err))?;

    let code = exit_code_of(status);
    info!(
        target: "newsletter_launch::pipeline",
        command = %planned.display(),
        exit_code = code,
        "Pipeline process exited"
    );
    span.finish(code);
    Ok(code)
}

/// Console indicator printed after the pipeline exits.
pub fn outcome_message(exit_code: u8) -> String {
    if exit_code == 0 {
        "✅ Pipeline completed successfully".to_string()
    } else {
        format!("❌ Pipeline failed (exit code {exit_code})")
    }
}
