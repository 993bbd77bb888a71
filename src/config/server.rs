use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_SERVER_COMMAND: &str = "vllm";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_KILL_GRACE_SECS: u64 = 2;
const MAX_KILL_GRACE_SECS: u64 = 60;

/// Model server executable and log placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSection {
    pub command: String,
    pub log_dir: PathBuf,
    /// Pause after killing the previous listener.
    pub kill_grace_secs: u64,
}

impl ServerSection {
    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            kill_grace_secs: DEFAULT_KILL_GRACE_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawServerSection {
    pub command: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub kill_grace_secs: Option<u64>,
}

pub fn parse_server_section(
    raw: Option<RawServerSection>,
    path: &Path,
) -> Result<ServerSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = ServerSection::default();

    let command = raw.command.unwrap_or(defaults.command);
    if command.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "server.command",
            message: "must not be empty".into(),
        });
    }

    let log_dir = raw
        .log_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(defaults.log_dir);

    let kill_grace_secs = raw.kill_grace_secs.unwrap_or(defaults.kill_grace_secs);
    validate_kill_grace(kill_grace_secs, path)?;

    Ok(ServerSection {
        command,
        log_dir,
        kill_grace_secs,
    })
}

fn validate_kill_grace(secs: u64, path: &Path) -> Result<(), ConfigError> {
    if secs <= MAX_KILL_GRACE_SECS {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "server.kill_grace_secs",
        message: format!("Use a pause of at most {MAX_KILL_GRACE_SECS} seconds"),
    })
}
