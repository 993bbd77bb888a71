//! CLI argument definitions for both launchers.
use std::path::PathBuf;

use clap::Parser;

use super::profile::{
    ServeProfile, DEFAULT_GPU_MEMORY_UTILIZATION, DEFAULT_HOST, DEFAULT_MAX_MODEL_LEN,
    DEFAULT_MODEL, DEFAULT_PORT,
};
use crate::{lib::errors::LaunchError, pipeline::PipelineRequest};

/// `run-pipeline` arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-pipeline",
    version,
    about = "Validate arguments and run the NewsLetter AI summary pipeline",
    after_help = "Example: run-pipeline KE 01 ra_summary 2025-04-30"
)]
pub struct PipelineArgs {
    /// Country code (e.g. KE).
    pub country: String,
    /// Ledger book code (e.g. 01).
    pub le_book: String,
    /// Pipeline type (e.g. ra_summary or bs_summary).
    pub pipeline_type: String,
    /// Business date as YYYY-MM-DD; defaults to today.
    pub business_date: Option<String>,
    /// Print the command that would run without starting it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Path to a launcher config file (overrides NEWSLETTER_LAUNCH_CONFIG).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
}

impl PipelineArgs {
    /// Validate the positional values, injecting `today` when no date was given.
    pub fn into_request(self, today: &str) -> Result<PipelineRequest, LaunchError> {
        PipelineRequest::from_parts(
            self.country,
            self.le_book,
            self.pipeline_type,
            self.business_date,
            today,
        )
    }
}

/// `serve-model` arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "serve-model",
    version,
    about = "Start the vLLM model server, freeing its port first if needed",
    long_about = None
)]
pub struct ServeArgs {
    /// Port the server listens on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Address the server binds to.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Model identifier to serve.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Maximum sequence length.
    #[arg(long, default_value_t = DEFAULT_MAX_MODEL_LEN)]
    pub max_model_len: u32,
    /// Fail instead of killing a process already listening on the port.
    #[arg(long, default_value_t = false)]
    pub no_kill: bool,
    /// Devices exposed to the server via CUDA_VISIBLE_DEVICES (e.g. 0,1).
    #[arg(long)]
    pub cuda_visible_devices: Option<String>,
    /// Fraction of GPU memory the server may use.
    #[arg(long, default_value_t = DEFAULT_GPU_MEMORY_UTILIZATION)]
    pub gpu_memory_utilization: f32,
    /// Tensor parallel size; omitted from the server command when unset.
    #[arg(long)]
    pub tensor_parallel_size: Option<u32>,
    /// Print the command that would run without touching the port or starting it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Path to a launcher config file (overrides NEWSLETTER_LAUNCH_CONFIG).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
}

impl ServeArgs {
    /// Build a validated `ServeProfile`.
    pub fn into_profile(self) -> Result<ServeProfile, LaunchError> {
        let profile = ServeProfile {
            port: self.port,
            host: self.host,
            model: self.model,
            max_model_len: self.max_model_len,
            kill_existing: !self.no_kill,
            cuda_visible_devices: self.cuda_visible_devices,
            gpu_memory_utilization: self.gpu_memory_utilization,
            tensor_parallel_size: self.tensor_parallel_size,
            dry_run: self.dry_run,
        };
        profile.validate()?;
        Ok(profile)
    }
}
