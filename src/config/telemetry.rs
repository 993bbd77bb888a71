use tracing::{debug, info};

use super::{ConfigSource, LaunchConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_source(source: &ConfigSource) {
    match source {
        ConfigSource::Cli(path) => info!(
            target: "newsletter_launch::config",
            path = %path.display(),
            "Loading configuration given by --config"
        ),
        ConfigSource::Env(path) => info!(
            target: "newsletter_launch::config",
            path = %path.display(),
            "Loading configuration using NEWSLETTER_LAUNCH_CONFIG environment variable"
        ),
        ConfigSource::DefaultFile(path) => debug!(
            target: "newsletter_launch::config",
            path = %path.display(),
            "Loading configuration from working directory"
        ),
        ConfigSource::BuiltIn => debug!(
            target: "newsletter_launch::config",
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "No configuration file found; using built-in defaults"
        ),
    }
}

pub fn log_loaded(config: &LaunchConfig) {
    let path = config
        .source_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    info!(
        target: "newsletter_launch::config",
        path = %path,
        interpreter = %config.pipeline.interpreter,
        script = %config.pipeline.script.display(),
        pipeline_types = config.pipeline.pipeline_types.len(),
        server_command = %config.server.command,
        log_dir = %config.server.log_dir.display(),
        kill_grace_secs = config.server.kill_grace_secs,
        "Configuration file loaded successfully"
    );
}
