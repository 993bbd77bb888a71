//! Log file locations for the model server launcher.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use crate::lib::errors::LaunchError;

/// Per-port log file name, e.g. `vllm_8011.log`.
pub fn server_log_path(log_dir: &Path, port: u16) -> PathBuf {
    log_dir.join(format!("vllm_{port}.log"))
}

/// Create the log directory if needed and open the per-port log for appending.
pub fn open_append_log(log_dir: &Path, port: u16) -> Result<(PathBuf, File), LaunchError> {
    fs::create_dir_all(log_dir).map_err(|source| LaunchError::LogFile {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let path = server_log_path(log_dir, port);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LaunchError::LogFile {
            path: path.clone(),
            source,
        })?;
    Ok((path, file))
}
