//! Load and validate launcher configuration.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod pipeline;
pub mod server;
pub mod telemetry;

pub use pipeline::{
    parse_pipeline_section, PipelineSection, RawPipelineSection, DEFAULT_INTERPRETER,
    DEFAULT_PIPELINE_TYPES, DEFAULT_SCRIPT,
};
pub use server::{
    parse_server_section, RawServerSection, ServerSection, DEFAULT_KILL_GRACE_SECS,
    DEFAULT_LOG_DIR, DEFAULT_SERVER_COMMAND,
};

pub const CONFIG_ENV_KEY: &str = "NEWSLETTER_LAUNCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "newsletter-launch.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line; must exist.
    Cli(PathBuf),
    /// `NEWSLETTER_LAUNCH_CONFIG`; must exist.
    Env(PathBuf),
    /// `newsletter-launch.toml` found in the working directory.
    DefaultFile(PathBuf),
    /// No file; built-in defaults.
    BuiltIn,
}

/// Top-level configuration container.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    pub pipeline: PipelineSection,
    pub server: ServerSection,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLaunchConfig {
    pipeline: Option<RawPipelineSection>,
    server: Option<RawServerSection>,
}

/// Resolve the config source in the order: CLI override → env var → default file → built-in.
pub fn resolve_config_source(cli_override: Option<PathBuf>) -> ConfigSource {
    resolve_config_source_from(
        cli_override,
        env::var_os(CONFIG_ENV_KEY),
        Path::new(DEFAULT_CONFIG_PATH),
    )
}

fn resolve_config_source_from(
    cli_override: Option<PathBuf>,
    env_value: Option<OsString>,
    default_path: &Path,
) -> ConfigSource {
    if let Some(path) = cli_override {
        return ConfigSource::Cli(path);
    }
    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        return ConfigSource::Env(PathBuf::from(value));
    }
    if default_path.is_file() {
        return ConfigSource::DefaultFile(default_path.to_path_buf());
    }
    ConfigSource::BuiltIn
}

impl LaunchConfig {
    /// Resolve the source and load it.
    pub fn load(cli_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let source = resolve_config_source(cli_override);
        telemetry::log_source(&source);
        Self::load_from_source(source)
    }

    pub fn load_from_source(source: ConfigSource) -> Result<Self, ConfigError> {
        match source {
            ConfigSource::Cli(path) | ConfigSource::Env(path) => {
                if !path.is_file() {
                    return Err(ConfigError::MissingFile { path });
                }
                Self::load_from_path(path)
            }
            ConfigSource::DefaultFile(path) => Self::load_from_path(path),
            ConfigSource::BuiltIn => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "newsletter_launch::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "newsletter_launch::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawLaunchConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "newsletter_launch::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "newsletter_launch::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawLaunchConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let pipeline = parse_pipeline_section(raw.pipeline, &path)?;
        let server = parse_server_section(raw.server, &path)?;

        Ok(Self {
            pipeline,
            server,
            source_path: Some(path),
        })
    }
}
