//! Resolved model server profile and flag validation.

use crate::lib::errors::LaunchError;

pub const DEFAULT_PORT: u16 = 8011;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MODEL: &str = "Qwen/Qwen3-4B";
pub const DEFAULT_MAX_MODEL_LEN: u32 = 8000;
pub const DEFAULT_GPU_MEMORY_UTILIZATION: f32 = 0.9;

/// Resolved `serve-model` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeProfile {
    pub port: u16,
    pub host: String,
    pub model: String,
    pub max_model_len: u32,
    /// False when `--no-kill` was given.
    pub kill_existing: bool,
    pub cuda_visible_devices: Option<String>,
    pub gpu_memory_utilization: f32,
    pub tensor_parallel_size: Option<u32>,
    pub dry_run: bool,
}

impl ServeProfile {
    /// Check the flag values the server would otherwise reject after a slow startup.
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.port == 0 {
            return Err(invalid_flag("--port", "must be between 1 and 65535"));
        }
        if self.host.trim().is_empty() {
            return Err(invalid_flag("--host", "must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid_flag("--model", "must not be empty"));
        }
        if self.max_model_len == 0 {
            return Err(invalid_flag("--max-model-len", "must be positive"));
        }
        if !(self.gpu_memory_utilization > 0.0 && self.gpu_memory_utilization <= 1.0) {
            return Err(invalid_flag(
                "--gpu-memory-utilization",
                "must be greater than 0 and at most 1",
            ));
        }
        if self.tensor_parallel_size == Some(0) {
            return Err(invalid_flag("--tensor-parallel-size", "must be at least 1"));
        }
        if let Some(devices) = &self.cuda_visible_devices {
            if devices.split(',').any(|device| device.trim().is_empty()) {
                return Err(invalid_flag(
                    "--cuda-visible-devices",
                    "expected a comma-separated list such as 0,1",
                ));
            }
        }
        Ok(())
    }
}

fn invalid_flag(flag: &'static str, message: &str) -> LaunchError {
    LaunchError::InvalidFlag {
        flag,
        message: message.into(),
    }
}
