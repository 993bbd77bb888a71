//! Builds the `vllm serve` invocation.

use crate::{cli::ServeProfile, config::ServerSection, lib::process::PlannedCommand};

pub const CUDA_VISIBLE_DEVICES_ENV: &str = "CUDA_VISIBLE_DEVICES";

/// `<command> serve <model> --host H --port P --max-model-len N --gpu-memory-utilization F [--tensor-parallel-size T]`.
pub fn build_server_command(section: &ServerSection, profile: &ServeProfile) -> PlannedCommand {
    let mut command = PlannedCommand::new(&section.command)
        .arg("serve")
        .arg(&profile.model)
        .flag("--host", &profile.host)
        .flag("--port", profile.port)
        .flag("--max-model-len", profile.max_model_len)
        .flag("--gpu-memory-utilization", profile.gpu_memory_utilization);

    if let Some(size) = profile.tensor_parallel_size {
        command = command.flag("--tensor-parallel-size", size);
    }
    if let Some(devices) = &profile.cuda_visible_devices {
        command
            .env
            .insert(CUDA_VISIBLE_DEVICES_ENV.to_string(), devices.clone());
    }
    command
}
