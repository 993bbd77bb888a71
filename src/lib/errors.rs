use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file {path} does not exist")]
    MissingFile { path: PathBuf },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Terminal failures of either launcher. None of them are retried.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Value for {field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("Business date `{value}` must match YYYY-MM-DD")]
    InvalidBusinessDate { value: String },
    #[error("Pipeline type `{value}` is not one of [{allowed}]")]
    PipelineTypeNotAllowed { value: String, allowed: String },
    #[error("Invalid value for {flag}: {message}")]
    InvalidFlag { flag: &'static str, message: String },
    #[error("Port {port} is already in use and --no-kill was given")]
    PortBusy { port: u16 },
    #[error("Port {port} is in use but neither lsof nor sudo lsof reports an owning process")]
    ListenerNotFound { port: u16 },
    #[error("Required program `{program}` was not found; install it or add it to PATH")]
    MissingDependency { program: String },
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to terminate process {pid} holding port {port}: {message}")]
    KillFailed { pid: u32, port: u16, message: String },
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O failed while relaying output of `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Classify a spawn failure: a program missing from PATH is reported as a missing dependency.
    pub fn from_spawn(program: impl Into<String>, source: io::Error) -> Self {
        let program = program.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingDependency { program }
        } else {
            Self::Spawn { program, source }
        }
    }
}
